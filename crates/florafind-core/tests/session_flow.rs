//! Session flows against a scripted backend.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};

use florafind_core::chat::{Sender, CONNECTION_ERROR};
use florafind_core::client::{AddToGardenArgs, Backend, TipArgs};
use florafind_core::flows;
use florafind_core::models::{
    ActionResponse, CareSchedule, Challenge, CompleteTaskResponse, GardenCareTask, GardenEntry,
    GardenPlantInfo, GardenResponse, LeaderboardEntry, LocationSuggestions, QueryOutcome,
    QueryReply, UserStats,
};
use florafind_core::storage::MemoryStore;
use florafind_core::wizard::{CareTaskWizard, WizardKind};
use florafind_core::{AppSession, ClientError, Section};

type Session = RefCell<AppSession<MemoryStore>>;

#[derive(Default)]
struct FakeBackend {
    calls: RefCell<Vec<String>>,
    garden: RefCell<GardenResponse>,
    reply: RefCell<Option<Result<QueryReply, ClientError>>>,
    stats: RefCell<VecDeque<UserStats>>,
    points_earned: Cell<i64>,
    action_success: Cell<bool>,
    while_loading_garden: RefCell<Option<Box<dyn Fn()>>>,
}

impl FakeBackend {
    fn new() -> Self {
        let fake = Self::default();
        fake.action_success.set(true);
        fake
    }

    fn log(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn action(&self) -> Result<ActionResponse, ClientError> {
        Ok(ActionResponse {
            success: self.action_success.get(),
            message: "Saved".into(),
        })
    }
}

#[async_trait(?Send)]
impl Backend for FakeBackend {
    async fn query(&self, q: &str, location: Option<&str>) -> Result<QueryReply, ClientError> {
        self.log(format!("query {} @{}", q, location.unwrap_or("-")));
        self.reply.borrow_mut().take().unwrap_or(Ok(QueryReply {
            outcome: QueryOutcome::Nothing,
            language: None,
        }))
    }

    async fn add_to_garden(&self, args: &AddToGardenArgs) -> Result<ActionResponse, ClientError> {
        self.log(format!("add_to_garden {} {}", args.plant_id, args.date_planted));
        self.action()
    }

    async fn care_calendar(&self, plant_id: u32, _: Option<&str>) -> Result<CareSchedule, ClientError> {
        self.log(format!("care_calendar {}", plant_id));
        Err(ClientError::Backend("Plant not found".into()))
    }

    async fn my_garden(&self) -> Result<GardenResponse, ClientError> {
        self.log("my_garden");
        if let Some(hook) = self.while_loading_garden.borrow().as_ref() {
            hook();
        }
        Ok(self.garden.borrow().clone())
    }

    async fn complete_care_task(&self, user_plant_id: u32, task: &str) -> Result<CompleteTaskResponse, ClientError> {
        self.log(format!("complete {} {}", user_plant_id, task));
        Ok(CompleteTaskResponse {
            success: true,
            message: "Task completed! +50 points".into(),
            points_earned: self.points_earned.get(),
        })
    }

    async fn challenges(&self) -> Result<Vec<Challenge>, ClientError> {
        self.log("challenges");
        Err(ClientError::Backend("database unavailable".into()))
    }

    async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ClientError> {
        self.log("leaderboard");
        Ok(vec![LeaderboardEntry {
            username: "Asha".into(),
            ..Default::default()
        }])
    }

    async fn submit_tip(&self, tip: &TipArgs) -> Result<ActionResponse, ClientError> {
        self.log(format!("tip {}", tip.plant_name));
        self.action()
    }

    async fn add_care_task(&self, user_plant_id: u32, task_type: &str, days: u32) -> Result<ActionResponse, ClientError> {
        self.log(format!("add_care_task {} {} {}", user_plant_id, task_type, days));
        self.action()
    }

    async fn location_suggestions(&self, city: &str) -> Result<LocationSuggestions, ClientError> {
        self.log(format!("location_suggestions {}", city));
        Ok(LocationSuggestions {
            location: city.into(),
            eco_tips: vec!["Collect rainwater".into()],
            ..Default::default()
        })
    }

    async fn user_stats(&self) -> Result<UserStats, ClientError> {
        self.log("user_stats");
        self.stats
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| ClientError::Network("connection refused".into()))
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 5).unwrap()
}

fn session() -> Rc<Session> {
    Rc::new(RefCell::new(AppSession::new(MemoryStore::new(), today())))
}

fn garden_with_task() -> GardenResponse {
    GardenResponse {
        garden: vec![GardenEntry {
            plant_info: GardenPlantInfo {
                user_plant_id: 4,
                name: "Rosa".into(),
                nickname: Some("Rose Bush".into()),
                health_score: Some(80.0),
                ..Default::default()
            },
            care_schedule: vec![GardenCareTask {
                task: "watering".into(),
                next_due: Some("2024-09-05".into()),
                ..Default::default()
            }],
        }],
        total_plants: 1,
        total_eco_impact: 7.5,
    }
}

#[tokio::test]
async fn test_section_reloads_and_unknown_section() {
    let s = session();
    let backend = FakeBackend::new();
    *backend.garden.borrow_mut() = garden_with_task();

    assert!(flows::show_section(s.as_ref(), &backend, "garden").await);
    assert_eq!(backend.calls(), vec!["my_garden"]);
    assert_eq!(s.borrow().garden_summary().total_plants, 1);
    assert_eq!(s.borrow().upcoming().len(), 1);

    assert!(!flows::show_section(s.as_ref(), &backend, "settings").await);
    assert_eq!(s.borrow().active_section(), Section::Garden);
    assert_eq!(backend.calls().len(), 1);

    flows::show_section(s.as_ref(), &backend, "community").await;
    assert_eq!(backend.calls()[1..], ["challenges", "leaderboard"]);
    assert!(s.borrow().challenges().is_empty());
    assert_eq!(s.borrow().leaderboard().len(), 1);
}

#[tokio::test]
async fn test_garden_response_after_navigation_is_discarded() {
    let s = session();
    let backend = FakeBackend::new();
    *backend.garden.borrow_mut() = garden_with_task();
    let nav = Rc::clone(&s);
    *backend.while_loading_garden.borrow_mut() = Some(Box::new(move || {
        nav.borrow_mut().show_section("calendar").unwrap();
    }));

    flows::show_section(s.as_ref(), &backend, "garden").await;
    assert_eq!(s.borrow().active_section(), Section::Calendar);
    assert!(s.borrow().garden().is_none());
}

#[tokio::test]
async fn test_chat_outcomes() {
    let s = session();
    let backend = FakeBackend::new();

    flows::send_message(s.as_ref(), &backend, "   ").await;
    assert!(backend.calls().is_empty());

    s.borrow_mut().set_location(Some("Pune"));
    *backend.reply.borrow_mut() = Some(Ok(QueryReply {
        outcome: QueryOutcome::Message {
            message: "Water **daily** in summer".into(),
            suggestions: vec![],
            analysis: None,
        },
        language: Some("es".into()),
    }));
    flows::send_message(s.as_ref(), &backend, "tulsi care").await;
    assert_eq!(backend.calls(), vec!["query tulsi care @Pune"]);
    {
        let session = s.borrow();
        let log = session.chat().messages();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].sender, Sender::User);
        assert!(log[1].html.contains("<strong>daily</strong>"));
        assert_eq!(session.language().code(), "es");
        assert!(!session.typing());
    }

    *backend.reply.borrow_mut() = Some(Err(ClientError::Backend("Search failed".into())));
    flows::send_message(s.as_ref(), &backend, "roses").await;
    assert_eq!(s.borrow().chat().last().unwrap().html, "❌ Error: Search failed");

    *backend.reply.borrow_mut() = Some(Err(ClientError::Network("offline".into())));
    flows::quick_query(s.as_ref(), &backend, "Native plants Mumbai").await;
    assert_eq!(s.borrow().chat().last().unwrap().html, CONNECTION_ERROR);
    assert_eq!(s.borrow().chat().len(), 6);
}

#[tokio::test]
async fn test_completion_triggers_achievement_check() {
    let s = session();
    let backend = FakeBackend::new();
    backend.points_earned.set(50);
    backend.stats.borrow_mut().extend([
        UserStats { points: 250, level: 2, badges: 3 },
        UserStats { points: 300, level: 2, badges: 4 },
    ]);

    flows::complete_task(s.as_ref(), &backend, 4, "watering").await;
    assert_eq!(backend.calls(), vec!["complete 4 watering", "my_garden", "user_stats"]);
    assert_eq!(s.borrow().stats().badges, 3);
    assert!(s.borrow().achievement().is_none());

    let shown = flows::run_timers(s.as_ref(), &backend, Utc::now() + Duration::seconds(2)).await;
    assert!(shown.is_empty());
    let achievement = s.borrow().achievement().unwrap();
    assert_eq!(achievement.new_badges, 1);
    assert_eq!(achievement.points, 300);
}

#[tokio::test]
async fn test_low_points_skip_achievement_check() {
    let s = session();
    let backend = FakeBackend::new();
    backend.points_earned.set(10);
    flows::complete_task(s.as_ref(), &backend, 4, "pruning").await;
    // only the success toast's dismissal timer is pending
    assert_eq!(s.borrow().scheduler().pending(), 1);
}

#[tokio::test]
async fn test_custom_care_task_and_failures() {
    let s = session();
    let backend = FakeBackend::new();

    let mut wiz = CareTaskWizard::new(4, "Rose Bush");
    wiz.select_option("6").unwrap();
    wiz.enter_detail(Some("Rotate Pot"), "oops").unwrap();
    let draft = wiz.confirm().unwrap();
    assert_eq!(draft.days, draft.kind.default_days());

    flows::add_care_task(s.as_ref(), &backend, 4, &draft).await;
    assert_eq!(backend.calls()[0], "add_care_task 4 rotate_pot 7");
    assert_eq!(s.borrow().toasts()[0].message, "✅ Saved");

    backend.action_success.set(false);
    let tip = TipArgs {
        plant_name: "Tulsi".into(),
        care_tip: "Morning sun".into(),
        location: "Pune".into(),
    };
    assert!(!flows::submit_tip(s.as_ref(), &backend, &tip).await);
    flows::show_care_calendar(s.as_ref(), &backend, 99).await;
    let messages: Vec<String> = s.borrow().toasts().iter().map(|t| t.message.clone()).collect();
    assert_eq!(messages[1..], ["Failed to submit tip", "Plant not found"]);
}

#[tokio::test]
async fn test_add_to_garden_refreshes_stats() {
    let s = session();
    let backend = FakeBackend::new();
    backend.stats.borrow_mut().push_back(UserStats { points: 10, level: 1, badges: 0 });

    flows::add_to_garden(s.as_ref(), &backend, 3, "Tulsi", today()).await;
    assert_eq!(backend.calls(), vec!["add_to_garden 3 2024-09-05", "user_stats"]);
    assert_eq!(s.borrow().toasts()[0].message, "🌱 Tulsi added to your garden!");
    assert_eq!(s.borrow().stats().points, 10);
}

#[tokio::test]
async fn test_location_defaults_to_mumbai() {
    let s = session();
    let backend = FakeBackend::new();
    flows::location_suggestions(s.as_ref(), &backend, None).await;
    flows::location_suggestions(s.as_ref(), &backend, Some("Delhi")).await;
    assert_eq!(
        backend.calls(),
        vec!["location_suggestions Mumbai", "location_suggestions Delhi"]
    );
    assert!(s.borrow().chat().last().unwrap().html.contains("Collect rainwater"));
}
