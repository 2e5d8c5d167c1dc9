//! Markup Actions
//!
//! Buttons inside rendered fragments carry `data-*` attributes instead of
//! inline handlers. The UI delegates clicks and parses them back here.

use super::markup::escape_html;
use crate::section::Section;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddToGarden { plant_id: u32, name: String },
    CareCalendar { plant_id: u32 },
    SetReminder { user_plant_id: u32, name: String },
    AddCareTask { user_plant_id: u32, name: String },
    EditNotes { user_plant_id: u32, name: String },
    CompleteTask { user_plant_id: u32, task: String },
    ShowSection(Section),
}

impl Action {
    pub fn tag(&self) -> &'static str {
        match self {
            Action::AddToGarden { .. } => "add-to-garden",
            Action::CareCalendar { .. } => "care-calendar",
            Action::SetReminder { .. } => "set-reminder",
            Action::AddCareTask { .. } => "add-care-task",
            Action::EditNotes { .. } => "edit-notes",
            Action::CompleteTask { .. } => "complete-task",
            Action::ShowSection(_) => "show-section",
        }
    }

    fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Action::AddToGarden { plant_id, name } => {
                vec![("data-plant-id", plant_id.to_string()), ("data-name", name.clone())]
            }
            Action::CareCalendar { plant_id } => vec![("data-plant-id", plant_id.to_string())],
            Action::SetReminder { user_plant_id, name }
            | Action::AddCareTask { user_plant_id, name }
            | Action::EditNotes { user_plant_id, name } => vec![
                ("data-user-plant-id", user_plant_id.to_string()),
                ("data-name", name.clone()),
            ],
            Action::CompleteTask { user_plant_id, task } => vec![
                ("data-user-plant-id", user_plant_id.to_string()),
                ("data-task", task.clone()),
            ],
            Action::ShowSection(section) => vec![("data-section", section.as_str().to_string())],
        }
    }

    /// `<button class="quick-btn" data-action=...>label</button>`
    pub fn button(&self, label: &str) -> String {
        let mut html = format!(r#"<button class="quick-btn" data-action="{}""#, self.tag());
        for (name, value) in self.attributes() {
            html.push_str(&format!(r#" {}="{}""#, name, escape_html(&value)));
        }
        html.push('>');
        html.push_str(label);
        html.push_str("</button>");
        html
    }

    /// Rebuild an action from an element's attributes.
    /// Returns None for unknown tags or missing/invalid ids.
    pub fn from_attributes(attr: impl Fn(&str) -> Option<String>) -> Option<Action> {
        let id = |name: &str| attr(name).and_then(|v| v.parse::<u32>().ok());
        let text = |name: &str| attr(name).unwrap_or_default();
        let action = match attr("data-action")?.as_str() {
            "add-to-garden" => Action::AddToGarden {
                plant_id: id("data-plant-id")?,
                name: text("data-name"),
            },
            "care-calendar" => Action::CareCalendar {
                plant_id: id("data-plant-id")?,
            },
            "set-reminder" => Action::SetReminder {
                user_plant_id: id("data-user-plant-id")?,
                name: text("data-name"),
            },
            "add-care-task" => Action::AddCareTask {
                user_plant_id: id("data-user-plant-id")?,
                name: text("data-name"),
            },
            "edit-notes" => Action::EditNotes {
                user_plant_id: id("data-user-plant-id")?,
                name: text("data-name"),
            },
            "complete-task" => Action::CompleteTask {
                user_plant_id: id("data-user-plant-id")?,
                task: text("data-task"),
            },
            "show-section" => Action::ShowSection(Section::parse(&attr("data-section")?).ok()?),
            _ => return None,
        };
        Some(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Pull attribute pairs back out of a rendered button
    fn attrs_of(html: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        for part in html.split("\" ") {
            if let Some((k, v)) = part.split_once("=\"") {
                let key = k.rsplit(' ').next().unwrap_or(k).to_string();
                let value = v.split('"').next().unwrap_or(v);
                map.insert(key, value.replace("&#39;", "'").replace("&amp;", "&"));
            }
        }
        map
    }

    #[test]
    fn test_button_attributes_parse_back() {
        let action = Action::CompleteTask {
            user_plant_id: 12,
            task: "watering".into(),
        };
        let html = action.button("Done");
        let attrs = attrs_of(&html);
        let parsed = Action::from_attributes(|k| attrs.get(k).cloned());
        assert_eq!(parsed, Some(action));
    }

    #[test]
    fn test_names_are_attribute_escaped() {
        let html = Action::AddToGarden {
            plant_id: 1,
            name: r#"Bird's "nest" fern"#.into(),
        }
        .button("Add");
        assert!(html.contains(r#"data-name="Bird&#39;s &quot;nest&quot; fern""#));
    }

    #[test]
    fn test_invalid_attributes_are_rejected() {
        let attrs: HashMap<&str, &str> =
            HashMap::from([("data-action", "care-calendar"), ("data-plant-id", "abc")]);
        assert_eq!(Action::from_attributes(|k| attrs.get(k).map(|v| v.to_string())), None);

        let attrs: HashMap<&str, &str> = HashMap::from([("data-action", "explode")]);
        assert_eq!(Action::from_attributes(|k| attrs.get(k).map(|v| v.to_string())), None);

        let attrs: HashMap<&str, &str> =
            HashMap::from([("data-action", "show-section"), ("data-section", "garden")]);
        assert_eq!(
            Action::from_attributes(|k| attrs.get(k).map(|v| v.to_string())),
            Some(Action::ShowSection(Section::Garden))
        );
    }
}
