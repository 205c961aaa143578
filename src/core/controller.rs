use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, instrument, warn};

use super::render;
use super::reply::*;
use super::session::Session;
use super::session_store::SessionStore;
use super::step::{primary_field, Field, Step};
use crate::constants::{
    GENERIC_FAILURE_MESSAGE, HISTORY_PAGE_SIZE, MEETING_DOC_TYPE, MEETING_STYLE,
};
use crate::errors::Error;
use crate::history::{HistoryStore, NewHistoryRecord};
use crate::tasks::{
    AnalysisType, DocumentRequest, FinanceRequest, LegalRequest, MarketingRequest, TaskKind,
    TaskRequest, TaskResult, TaskService,
};

const WELCOME_MESSAGE: &str = "👋 Hi! I'm AlfaPilot, your business assistant.\n\n\
I can write marketing posts, draft documents, review contracts, analyze financial data \
and summarize meetings.\n\nChoose a category to get started:";

const SETTINGS_MESSAGE: &str = "⚙️ Settings\n\nNothing to configure yet. \
The AI provider is chosen by the service operator.";

const STILL_WORKING_MESSAGE: &str =
    "⏳ Still working on your previous request. Please wait or go back to the main menu.";

const CHOOSE_CATEGORY_MESSAGE: &str = "Please choose a category from the menu:";

/// One inbound user message
#[derive(Debug, Clone)]
pub struct Incoming {
    pub user_id: i64,
    pub text: String,
    pub message_id: Option<i64>,
}

impl Incoming {
    pub fn new(user_id: i64, text: impl Into<String>) -> Self {
        Incoming {
            user_id,
            text: text.into(),
            message_id: None,
        }
    }
}

/// Inputs honored in every state
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Start,
    MainMenu,
    Categories,
    Settings,
    History(i64),
    Show(i64),
    Repeat(i64),
    Delete(i64),
    Enter(TaskKind),
    PromoPost,
    Usage(&'static str),
}

/// Result of applying one input to a session while its lock is held
enum Transition {
    Reply(Vec<Reply>),
    Invoke(Invocation),
}

/// A task invocation started by a session in a given generation
struct Invocation {
    kind: TaskKind,
    request: TaskRequest,
    generation: u64,
    message_id: Option<i64>,
}

/// Drives per-user conversations: collects inputs, invokes tasks, writes
/// history and renders replies.
pub struct ConversationController {
    tasks: TaskService,
    history: Arc<dyn HistoryStore>,
    sessions: SessionStore,
}

impl ConversationController {
    pub fn new(tasks: TaskService, history: Arc<dyn HistoryStore>) -> Self {
        ConversationController {
            tasks,
            history,
            sessions: SessionStore::new(),
        }
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Copy of the user's current session
    pub async fn session(&self, user_id: i64) -> Session {
        self.sessions.snapshot(user_id).await
    }

    /// Handles one user message and returns the replies to send.
    #[instrument(skip(self, incoming), fields(user_id = incoming.user_id))]
    pub async fn handle(&self, incoming: Incoming) -> Vec<Reply> {
        if let Some(command) = parse_command(&incoming.text) {
            debug!("command {:?}", command);
            return self.run_command(command, &incoming).await;
        }

        let transition = {
            let entry = self.sessions.entry(incoming.user_id);
            let mut session = entry.lock().await;
            self.apply_input(&mut session, &incoming)
        };
        self.settle(incoming.user_id, transition).await
    }

    /// Starts `kind` with its primary input already known, then continues
    /// exactly as if the user had typed it.
    #[instrument(skip(self, raw_input))]
    pub async fn replay(
        &self,
        user_id: i64,
        kind: TaskKind,
        raw_input: &str,
        message_id: Option<i64>,
    ) -> Vec<Reply> {
        let transition = {
            let entry = self.sessions.entry(user_id);
            let mut session = entry.lock().await;
            session.enter(kind);
            session.set_field(primary_field(kind), raw_input);
            self.continue_collection(&mut session, message_id)
        };
        self.settle(user_id, transition).await
    }

    /// Replays a stored request. Fails with `NotFound` when the record is
    /// missing or belongs to someone else.
    pub async fn repeat_from_history(
        &self,
        user_id: i64,
        record_id: i64,
        message_id: Option<i64>,
    ) -> Result<Vec<Reply>, Error> {
        let record = self.history.get(record_id, user_id).await?;
        let kind = record.kind().ok_or_else(|| {
            Error::InvalidUserInput(format!("unknown category '{}'", record.category))
        })?;

        info!("repeating record {} ({})", record_id, kind);
        let mut replies = vec![Reply::text(format!(
            "🔄 Repeating your {} request:\n\n{}",
            kind.title(),
            record.request_preview()
        ))];
        replies.extend(
            self.replay(user_id, kind, &record.request_text, message_id)
                .await,
        );
        Ok(replies)
    }

    /// One page of the user's history, newest first. Pages start at 1.
    pub async fn history_page(&self, user_id: i64, page: i64) -> Result<Reply, Error> {
        let page = page.max(1);
        let total = self.history.count_by_user(user_id).await?;
        let pages = (total + HISTORY_PAGE_SIZE - 1) / HISTORY_PAGE_SIZE;
        if total > 0 && page > pages {
            return Ok(Reply::new(
                format!("📚 There is no page {}. Your history has {} page(s).", page, pages),
                Menu::Main,
            ));
        }

        let records = self
            .history
            .list_by_user(user_id, HISTORY_PAGE_SIZE, (page - 1) * HISTORY_PAGE_SIZE)
            .await?;
        Ok(Reply::new(
            render::history_page(&records, page, pages),
            Menu::Main,
        ))
    }

    pub async fn history_detail(&self, user_id: i64, record_id: i64) -> Result<Reply, Error> {
        let record = self.history.get(record_id, user_id).await?;
        Ok(Reply::new(render::history_detail(&record), Menu::Main))
    }

    pub async fn delete_history(&self, user_id: i64, record_id: i64) -> Result<Reply, Error> {
        if !self.history.delete(record_id, user_id).await? {
            return Err(Error::NotFound(format!("history record {}", record_id)));
        }
        Ok(Reply::new(
            format!("🗑 Record #{} deleted.", record_id),
            Menu::Main,
        ))
    }

    async fn reset(&self, user_id: i64) {
        self.sessions.entry(user_id).lock().await.reset();
    }

    async fn run_command(&self, command: Command, incoming: &Incoming) -> Vec<Reply> {
        let user_id = incoming.user_id;
        match command {
            Command::Start => {
                self.reset(user_id).await;
                vec![Reply::new(WELCOME_MESSAGE, Menu::Categories)]
            }
            Command::MainMenu => {
                self.reset(user_id).await;
                vec![Reply::new("🏠 Main menu", Menu::Main)]
            }
            Command::Categories => {
                self.reset(user_id).await;
                vec![Reply::new("📂 Choose a category:", Menu::Categories)]
            }
            Command::Settings => vec![Reply::new(SETTINGS_MESSAGE, Menu::Main)],
            Command::History(page) => self
                .history_page(user_id, page)
                .await
                .map(|reply| vec![reply])
                .unwrap_or_else(history_failure),
            Command::Show(id) => self
                .history_detail(user_id, id)
                .await
                .map(|reply| vec![reply])
                .unwrap_or_else(history_failure),
            Command::Delete(id) => self
                .delete_history(user_id, id)
                .await
                .map(|reply| vec![reply])
                .unwrap_or_else(history_failure),
            Command::Repeat(id) => self
                .repeat_from_history(user_id, id, incoming.message_id)
                .await
                .unwrap_or_else(history_failure),
            Command::Enter(kind) => {
                let entry = self.sessions.entry(user_id);
                let mut session = entry.lock().await;
                session.enter(kind);
                let step = session.step();
                vec![Reply::new(render::step_prompt(step, None), menu_for_step(step))]
            }
            Command::PromoPost => {
                self.sessions
                    .entry(user_id)
                    .lock()
                    .await
                    .enter(TaskKind::Marketing);
                vec![Reply::new(
                    "📢 Promo post\n\nDescribe your promo offer or campaign:",
                    Menu::Scenario,
                )]
            }
            Command::Usage(text) => vec![Reply::text(text)],
        }
    }

    fn apply_input(&self, session: &mut Session, incoming: &Incoming) -> Transition {
        if session.is_busy() {
            return Transition::Reply(vec![Reply::new(STILL_WORKING_MESSAGE, Menu::Scenario)]);
        }

        let text = incoming.text.trim();
        let step = session.step();
        if let Some(field) = step.collects() {
            let value = match field {
                Field::DocType => strip_button_prefix(text),
                _ => text,
            };
            if value.is_empty() {
                return Transition::Reply(vec![Reply::new(
                    format!(
                        "Please send some text.\n\n{}",
                        render::step_prompt(step, session.field(Field::DocType))
                    ),
                    menu_for_step(step),
                )]);
            }
            session.set_field(field, value);
            return self.continue_collection(session, incoming.message_id);
        }

        let reply = match step {
            Step::Idle => Reply::new(CHOOSE_CATEGORY_MESSAGE, Menu::Categories),
            Step::SelectingVariant => select_variant(session, text),
            Step::ReviewingCorrections => match parse_yes_no(text) {
                Some(true) => {
                    session.reset();
                    Reply::new(
                        "✅ Corrections accepted. The document is saved in your history.",
                        Menu::Actions,
                    )
                }
                Some(false) => {
                    session.reset();
                    Reply::new("👌 The document is kept as generated.", Menu::Actions)
                }
                None => Reply::new(
                    "Please answer yes or no: apply the corrections?",
                    Menu::YesNo,
                ),
            },
            Step::OfferingReminder => offer_reminder(session, text),
            Step::OfferingSync => match parse_yes_no(text) {
                Some(true) => {
                    session.reset();
                    Reply::new(
                        "✅ Reminder marked for calendar and CRM sync.",
                        Menu::Actions,
                    )
                }
                Some(false) => {
                    session.reset();
                    Reply::new("✅ Work with the contract is complete.", Menu::Actions)
                }
                None => Reply::new(
                    "Please answer yes or no: sync the reminder with your calendar or CRM?",
                    Menu::YesNo,
                ),
            },
            Step::ChoosingFollowUp => match parse_finance_follow_up(text) {
                Some(Some(analysis_type)) => {
                    session.set_field(Field::AnalysisType, analysis_type.as_str());
                    return self.begin_invocation(session, incoming.message_id);
                }
                Some(None) => {
                    session.reset();
                    Reply::new("✅ Financial analysis complete.", Menu::Actions)
                }
                None => Reply::new(
                    "Please choose a comparison with the previous period or a forecast.",
                    Menu::FinanceFollowUp,
                ),
            },
            other => {
                warn!("no input handler for step {}", other);
                Reply::new(CHOOSE_CATEGORY_MESSAGE, Menu::Categories)
            }
        };
        Transition::Reply(vec![reply])
    }

    /// Moves to the first missing field of the active kind, or invokes the
    /// task once everything is collected.
    fn continue_collection(&self, session: &mut Session, message_id: Option<i64>) -> Transition {
        match session.next_missing() {
            Some(step) => {
                session.advance(step);
                Transition::Reply(vec![Reply::new(
                    render::step_prompt(step, session.field(Field::DocType)),
                    menu_for_step(step),
                )])
            }
            None => self.begin_invocation(session, message_id),
        }
    }

    fn begin_invocation(&self, session: &mut Session, message_id: Option<i64>) -> Transition {
        let request = match build_request(session) {
            Ok(request) => request,
            Err(err) => {
                error!("cannot build request in {}: {}", session.step(), err);
                session.reset();
                return Transition::Reply(vec![Reply::new(
                    CHOOSE_CATEGORY_MESSAGE,
                    Menu::Categories,
                )]);
            }
        };
        let Some(kind) = session.active_kind() else {
            return Transition::Reply(vec![Reply::new(CHOOSE_CATEGORY_MESSAGE, Menu::Categories)]);
        };

        session.set_busy(true);
        Transition::Invoke(Invocation {
            kind,
            request,
            generation: session.generation(),
            message_id,
        })
    }

    async fn settle(&self, user_id: i64, transition: Transition) -> Vec<Reply> {
        match transition {
            Transition::Reply(replies) => replies,
            Transition::Invoke(invocation) => self.invoke(user_id, invocation).await,
        }
    }

    /// Runs the task without holding the session, then commits the outcome
    /// only if the session was not reset meanwhile. The history write happens
    /// after the session is released.
    async fn invoke(&self, user_id: i64, invocation: Invocation) -> Vec<Reply> {
        info!("invoking {} task", invocation.kind);
        let entry = self.sessions.entry(user_id);
        let mut guard = BusyGuard::new(entry.clone(), invocation.generation);
        let outcome = self.tasks.execute(&invocation.request).await;

        let (reply, record) = {
            let mut session = entry.lock().await;
            guard.disarm();
            if session.generation() != invocation.generation || !session.is_busy() {
                info!(
                    "discarding {} result, session moved on",
                    invocation.kind
                );
                return Vec::new();
            }
            session.set_busy(false);

            let result = match outcome {
                Ok(result) => result,
                Err(err) => {
                    error!("{} task failed: {}", invocation.kind, err);
                    session.reset();
                    return vec![Reply::new(GENERIC_FAILURE_MESSAGE, Menu::Categories)];
                }
            };

            let record = NewHistoryRecord::for_result(
                user_id,
                invocation.kind,
                invocation.request.primary_input(),
                &result,
                invocation.message_id,
            );
            (present(&mut session, &invocation, result), record)
        };

        match record {
            Ok(record) => self.record(record).await,
            Err(err) => error!("cannot encode history record: {}", err),
        }
        vec![reply]
    }

    async fn record(&self, record: NewHistoryRecord) {
        match self.history.append(record).await {
            Ok(id) => debug!("saved history record {}", id),
            Err(err) => error!("failed to save history: {}", err),
        }
    }
}

/// Clears the busy flag when an invocation is dropped before it settles,
/// e.g. when the caller of `handle` goes away mid-request.
struct BusyGuard {
    session: Option<Arc<AsyncMutex<Session>>>,
    generation: u64,
}

impl BusyGuard {
    fn new(session: Arc<AsyncMutex<Session>>, generation: u64) -> Self {
        BusyGuard {
            session: Some(session),
            generation,
        }
    }

    fn disarm(&mut self) {
        self.session = None;
    }
}

fn release_abandoned(session: &mut Session, generation: u64) {
    if session.generation() == generation && session.is_busy() {
        warn!("invocation abandoned in {}, clearing busy flag", session.step());
        session.set_busy(false);
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let generation = self.generation;
        if let Ok(mut locked) = session.try_lock() {
            release_abandoned(&mut locked, generation);
            return;
        }
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                release_abandoned(&mut *session.lock().await, generation);
            });
        }
    }
}

/// Renders a fresh result and moves the session to its follow-up step, or
/// back to idle when the scenario ends here.
fn present(session: &mut Session, invocation: &Invocation, result: TaskResult) -> Reply {
    match (invocation.kind, result) {
        (TaskKind::Marketing, TaskResult::Marketing(result)) => {
            let text = render::marketing(&result);
            let count = render::selectable_variants(&result);
            if count == 0 {
                session.reset();
                return Reply::new(text, Menu::Actions);
            }
            session.advance(Step::SelectingVariant);
            session.set_last_result(TaskResult::Marketing(result));
            Reply::new(text, Menu::Variants(count))
        }
        (TaskKind::Document, TaskResult::Document(result)) => {
            let doc_type = session.field(Field::DocType).unwrap_or("Document");
            let text = render::document(doc_type, &result);
            if result.corrections.is_empty() {
                session.reset();
                return Reply::new(text, Menu::Actions);
            }
            session.advance(Step::ReviewingCorrections);
            session.set_last_result(TaskResult::Document(result));
            Reply::new(text, Menu::YesNo)
        }
        (TaskKind::Meeting, TaskResult::Document(result)) => {
            session.reset();
            Reply::new(render::meeting(&result), Menu::Actions)
        }
        (TaskKind::Legal, TaskResult::Legal(result)) => {
            let text = render::legal(&result);
            session.advance(Step::OfferingReminder);
            session.set_last_result(TaskResult::Legal(result));
            Reply::new(text, Menu::YesNo)
        }
        (TaskKind::Finance, TaskResult::Finance(result)) => {
            let analysis_type = match &invocation.request {
                TaskRequest::Finance(request) => request.analysis_type,
                _ => AnalysisType::Summary,
            };
            let text = render::finance(analysis_type, &result);
            if analysis_type != AnalysisType::Summary {
                session.reset();
                return Reply::new(text, Menu::Actions);
            }
            session.advance(Step::ChoosingFollowUp);
            session.set_last_result(TaskResult::Finance(result));
            Reply::new(text, Menu::FinanceFollowUp)
        }
        (kind, other) => {
            warn!("{} task returned a {} result", kind, other.kind());
            session.reset();
            Reply::new(other.summary_text(), Menu::Actions)
        }
    }
}

fn select_variant(session: &mut Session, text: &str) -> Reply {
    let chosen = match session.last_result() {
        Some(TaskResult::Marketing(result)) => {
            let count = render::selectable_variants(result);
            match text.parse::<usize>() {
                Ok(n) if (1..=count).contains(&n) => {
                    Ok((n, result.post_variants[n - 1].clone()))
                }
                _ => Err(count),
            }
        }
        _ => Err(0),
    };

    match chosen {
        Ok((n, variant)) => {
            session.reset();
            Reply::new(render::chosen_variant(n, &variant), Menu::Actions)
        }
        Err(count) => Reply::new(
            format!(
                "Please pick a variant number from 1 to {} or use the menu.",
                count.max(1)
            ),
            Menu::Variants(count.max(1)),
        ),
    }
}

fn offer_reminder(session: &mut Session, text: &str) -> Reply {
    match parse_yes_no(text) {
        Some(true) => {
            let mut message = String::from("⏰ Reminder added for the contract deadlines.");
            if let Some(TaskResult::Legal(result)) = session.last_result() {
                for item in &result.todo_items {
                    message.push_str("\n• ");
                    message.push_str(item);
                }
            }
            message.push_str("\n\nSync it with your calendar or CRM?");
            session.advance(Step::OfferingSync);
            Reply::new(message, Menu::YesNo)
        }
        Some(false) => {
            session.reset();
            Reply::new("✅ Contract analysis complete.", Menu::Actions)
        }
        None => Reply::new(
            "Please answer yes or no: add a deadline reminder?",
            Menu::YesNo,
        ),
    }
}

fn build_request(session: &Session) -> Result<TaskRequest, Error> {
    let kind = session
        .active_kind()
        .ok_or_else(|| Error::InvalidUserInput("no active scenario".to_string()))?;
    let get = |field: Field| {
        session
            .field(field)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidUserInput(format!("missing {:?}", field)))
    };

    Ok(match kind {
        TaskKind::Marketing => TaskRequest::Marketing(MarketingRequest::new(get(Field::Idea)?)),
        TaskKind::Document => TaskRequest::Document(DocumentRequest::new(
            get(Field::DocType)?,
            get(Field::Content)?,
        )),
        TaskKind::Legal => TaskRequest::Legal(LegalRequest::new(get(Field::ContractText)?)),
        TaskKind::Finance => TaskRequest::Finance(FinanceRequest {
            data: get(Field::FinanceData)?,
            analysis_type: match session.field(Field::AnalysisType) {
                Some(value) => value.parse()?,
                None => AnalysisType::Summary,
            },
        }),
        TaskKind::Meeting => TaskRequest::Document(DocumentRequest {
            doc_type: MEETING_DOC_TYPE.to_string(),
            content: get(Field::MeetingText)?,
            style: MEETING_STYLE.to_string(),
        }),
    })
}

fn menu_for_step(step: Step) -> Menu {
    match step {
        Step::AwaitingIdea => Menu::Marketing,
        Step::ChoosingDocType => Menu::DocumentTypes,
        _ => Menu::Scenario,
    }
}

fn history_failure(err: Error) -> Vec<Reply> {
    match err {
        Error::NotFound(what) => {
            debug!("not found: {}", what);
            vec![Reply::new("❌ Record not found.", Menu::Main)]
        }
        other => {
            error!("history request failed: {}", other);
            vec![Reply::new("❌ Failed to load history.", Menu::Main)]
        }
    }
}

/// Drops the emoji and punctuation a button label starts with.
fn strip_button_prefix(text: &str) -> &str {
    text.trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
}

fn normalize_choice(text: &str) -> String {
    strip_button_prefix(text)
        .trim_end_matches(['!', '.'])
        .to_lowercase()
}

fn parse_yes_no(text: &str) -> Option<bool> {
    match normalize_choice(text).as_str() {
        "yes" | "y" | "ok" | "sure" | "apply" | "add" | "sync" | "да" => Some(true),
        "no" | "n" | "skip" | "no thanks" | "нет" => Some(false),
        _ => None,
    }
}

/// `Some(None)` declines any further analysis
fn parse_finance_follow_up(text: &str) -> Option<Option<AnalysisType>> {
    let choice = normalize_choice(text);
    if choice.contains("compar") || choice.contains("сравн") {
        Some(Some(AnalysisType::Comparison))
    } else if choice.contains("forecast") || choice.contains("прогноз") {
        Some(Some(AnalysisType::Forecast))
    } else if parse_yes_no(&choice) == Some(false) {
        Some(None)
    } else {
        None
    }
}

fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();

    if lowered.starts_with('/') {
        let mut parts = lowered.split_whitespace();
        let head = parts.next().unwrap_or_default();
        let arg = parts.next().and_then(|value| value.parse::<i64>().ok());
        return match head {
            "/start" => Some(Command::Start),
            "/menu" => Some(Command::MainMenu),
            "/categories" => Some(Command::Categories),
            "/settings" => Some(Command::Settings),
            "/history" => Some(Command::History(arg.unwrap_or(1))),
            "/show" => Some(arg.map_or(Command::Usage("Usage: /show <id>"), Command::Show)),
            "/repeat" => Some(arg.map_or(Command::Usage("Usage: /repeat <id>"), Command::Repeat)),
            "/delete" => Some(arg.map_or(Command::Usage("Usage: /delete <id>"), Command::Delete)),
            _ => None,
        };
    }

    if trimmed == MAIN_MENU_BUTTON || lowered == "main menu" {
        return Some(Command::MainMenu);
    }
    if [CATEGORIES_BUTTON, NEW_SCENARIO_BUTTON].contains(&trimmed)
        || lowered == "categories"
        || lowered == "new scenario"
    {
        return Some(Command::Categories);
    }
    if trimmed == HISTORY_BUTTON || lowered == "history" {
        return Some(Command::History(1));
    }
    if trimmed == SETTINGS_BUTTON || lowered == "settings" {
        return Some(Command::Settings);
    }
    if trimmed == PROMO_POST_BUTTON {
        return Some(Command::PromoPost);
    }
    TaskKind::from_selection(trimmed).map(Command::Enter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_buttons() {
        assert_eq!(parse_command("/start"), Some(Command::Start));
        assert_eq!(parse_command(MAIN_MENU_BUTTON), Some(Command::MainMenu));
        assert_eq!(parse_command(NEW_SCENARIO_BUTTON), Some(Command::Categories));
        assert_eq!(parse_command("/history 3"), Some(Command::History(3)));
        assert_eq!(parse_command("/repeat 12"), Some(Command::Repeat(12)));
        assert_eq!(
            parse_command("⚖️ Legal help"),
            Some(Command::Enter(TaskKind::Legal))
        );
        assert!(matches!(parse_command("/show"), Some(Command::Usage(_))));
        assert_eq!(parse_command("Launch of a new coffee shop"), None);
    }

    #[test]
    fn test_yes_no_accepts_buttons() {
        assert_eq!(parse_yes_no(YES_BUTTON), Some(true));
        assert_eq!(parse_yes_no(NO_BUTTON), Some(false));
        assert_eq!(parse_yes_no("Да"), Some(true));
        assert_eq!(parse_yes_no("maybe later"), None);
    }

    #[test]
    fn test_finance_follow_up_choices() {
        assert_eq!(
            parse_finance_follow_up(FORECAST_BUTTON),
            Some(Some(AnalysisType::Forecast))
        );
        assert_eq!(
            parse_finance_follow_up("compare with last quarter"),
            Some(Some(AnalysisType::Comparison))
        );
        assert_eq!(parse_finance_follow_up("no"), Some(None));
        assert_eq!(parse_finance_follow_up("banana"), None);
    }

    #[test]
    fn test_strip_button_prefix() {
        assert_eq!(strip_button_prefix("📝 Letter"), "Letter");
        assert_eq!(strip_button_prefix("  Letter "), "Letter");
        assert_eq!(strip_button_prefix("💼 Commercial proposal"), "Commercial proposal");
    }

    #[test]
    fn test_build_request_for_meeting_uses_document_task() {
        let mut session = Session::default();
        session.enter(TaskKind::Meeting);
        session.set_field(Field::MeetingText, "We agreed on the budget");

        match build_request(&session) {
            Ok(TaskRequest::Document(request)) => {
                assert_eq!(request.doc_type, MEETING_DOC_TYPE);
                assert_eq!(request.style, MEETING_STYLE);
                assert_eq!(request.content, "We agreed on the budget");
            }
            other => panic!("unexpected request {:?}", other),
        }
    }
}
