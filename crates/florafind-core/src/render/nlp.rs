//! NLP Analysis Panel
//!
//! Tabbed breakdown of how the backend parsed a query.

use super::markup::escape_html;
use crate::models::NlpAnalysis;

/// (tab id, tab label)
pub const NLP_TABS: [(&str, &str); 5] = [
    ("tokenization", "Tokenization"),
    ("pos", "POS Tagging"),
    ("ner", "Named Entities"),
    ("dependency", "Dependency"),
    ("lemma", "Lemmatization"),
];

fn table(headers: &[&str], rows: Vec<Vec<&str>>) -> String {
    let mut html = String::from("<table><tr>");
    for h in headers {
        html.push_str(&format!("<th>{}</th>", h));
    }
    html.push_str("</tr>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn pane(id: &str, title: &str, active: bool, body: String) -> String {
    format!(
        r#"<div data-nlp-pane="{}" class="nlp-tab-content{}"><h5>{}</h5>{}</div>"#,
        id,
        if active { " active" } else { "" },
        title,
        body
    )
}

pub fn render_nlp_analysis(analysis: &NlpAnalysis) -> String {
    let mut html = String::from(r#"<div class="nlp-analysis-container"><h4>NLP Analysis Results</h4><div class="nlp-tabs">"#);
    for (i, (id, label)) in NLP_TABS.iter().enumerate() {
        html.push_str(&format!(
            r#"<button class="nlp-tab{}" data-nlp-tab="{}">{}</button>"#,
            if i == 0 { " active" } else { "" },
            id,
            label
        ));
    }
    html.push_str("</div>");

    let tokens = if analysis.tokenization.is_empty() {
        "No tokenization data available".to_string()
    } else {
        analysis
            .tokenization
            .iter()
            .map(|t| format!(r#"<span class="token">{}</span>"#, escape_html(&t.text)))
            .collect::<Vec<_>>()
            .join(" ")
    };
    html.push_str(&pane("tokenization", "Tokenization Results", true, tokens));

    let pos = if analysis.pos_tagging.is_empty() {
        "No POS tagging data available".to_string()
    } else {
        table(
            &["Token", "POS", "Tag"],
            analysis.pos_tagging.iter().map(|p| vec![p.text.as_str(), p.pos.as_str(), p.tag.as_str()]).collect(),
        )
    };
    html.push_str(&pane("pos", "Part-of-Speech Tagging", false, pos));

    let ner = if analysis.ner.is_empty() {
        "No named entities found".to_string()
    } else {
        analysis
            .ner
            .iter()
            .map(|e| {
                format!(
                    r#"<div class="entity"><span class="entity-text">{}</span><span class="entity-label">{}</span></div>"#,
                    escape_html(&e.text),
                    escape_html(&e.label)
                )
            })
            .collect()
    };
    html.push_str(&pane("ner", "Named Entity Recognition", false, ner));

    let deps = if analysis.dependency_parsing.is_empty() {
        "No dependency parsing data available".to_string()
    } else {
        table(
            &["Token", "Dependency", "Head"],
            analysis
                .dependency_parsing
                .iter()
                .map(|d| vec![d.text.as_str(), d.dep.as_str(), d.head.as_str()])
                .collect(),
        )
    };
    html.push_str(&pane("dependency", "Dependency Parsing", false, deps));

    let lemmas = if analysis.lemmatization.is_empty() {
        "No lemmatization data available".to_string()
    } else {
        table(
            &["Token", "Lemma"],
            analysis.lemmatization.iter().map(|l| vec![l.text.as_str(), l.lemma.as_str()]).collect(),
        )
    };
    html.push_str(&pane("lemma", "Lemmatization", false, lemmas));

    html.push_str("</div>");
    html
}
