//! Console front end: stdin/stdout REPL over the workbench and the
//! assistant session.

pub mod case_view;
pub mod command;

pub use case_view::render_case;
pub use command::{Command, CommandParser};

use std::fmt::Write as _;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::assistant::{AssistantEndpoint, HttpAssistant};
use crate::cases::{self, Case, DashboardFilter, Workbench};
use crate::config::AssistantConfig;
use crate::error::SendRejected;
use crate::session::{AssistantSession, ChatMessage, Role, SessionEvent};

const HELP: &str = "\
Commands:
  /open                 show the assistant panel and its transcript
  /close                hide the assistant panel
  /cases                list cases (under the active filter)
  /search <text>        search case number, party, summary, type
  /select <case>        select a case by case number
  /unselect             clear the selection
  /show [case]          case details (selected case if none given)
  /stats                dashboard counts
  /filter <name|all>    toggle new, in_progress, closed, critical, high
  /suggest              list suggested questions
  /pick <n>             ask suggestion n
  /quit                 exit
Anything else is sent to the assistant.";

/// What the REPL should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

pub struct Console {
    workbench: Workbench,
    session: Arc<AssistantSession>,
}

impl Console {
    pub fn new(workbench: Workbench, endpoint: Arc<dyn AssistantEndpoint>) -> Self {
        let session = workbench.session(endpoint);
        Self { workbench, session }
    }

    /// Load cases and build the HTTP endpoint described by `config`.
    pub fn from_config(config: &AssistantConfig) -> crate::error::Result<Self> {
        let case_list = match &config.cases_path {
            Some(path) => cases::load_cases(path)?,
            None => cases::demo_cases(),
        };
        let endpoint = Arc::new(HttpAssistant::from_config(config)?);
        Ok(Self::new(Workbench::new(case_list), endpoint))
    }

    pub fn session(&self) -> &Arc<AssistantSession> {
        &self.session
    }

    pub fn workbench(&self) -> &Workbench {
        &self.workbench
    }

    /// Execute one command and render its output.
    pub async fn handle(&mut self, command: Command) -> Outcome {
        let out = match command {
            Command::Quit => return Outcome::Quit,
            Command::Help => HELP.to_string(),
            Command::Invalid(msg) => format!("{}\nType /help for commands.", msg),
            Command::Open => {
                self.session.open().await;
                self.session
                    .transcript()
                    .await
                    .iter()
                    .map(render_message)
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            Command::Close => {
                self.session.close().await;
                "Assistant panel hidden.".to_string()
            }
            Command::Cases => {
                let cases = self.workbench.filtered();
                let mut out = match self.workbench.active_filter() {
                    Some(f) => format!("Filtered cases ({}, {:?}):\n", cases.len(), f),
                    None => format!("Cases ({}):\n", cases.len()),
                };
                out.push_str(&render_case_list(&cases));
                out
            }
            Command::Search(query) => {
                let cases = self.workbench.search(&query);
                let plural = if cases.len() == 1 { "" } else { "s" };
                format!(
                    "{} case{} found\n{}",
                    cases.len(),
                    plural,
                    render_case_list(&cases)
                )
            }
            Command::Select(number) => match self.workbench.select(&number) {
                Ok(case) => format!("Context: case {} selected", case.case_number),
                Err(e) => e.to_string(),
            },
            Command::Unselect => {
                self.workbench.clear_selection();
                "Selection cleared.".to_string()
            }
            Command::Show(number) => self.show_case(number.as_deref()),
            Command::Stats => {
                let s = self.workbench.stats();
                format!(
                    "Total {} | New {} | In progress {} | Closed {} | Critical {} | High {}",
                    s.total, s.new, s.in_progress, s.closed, s.critical, s.high
                )
            }
            Command::Filter(filter) => self.apply_filter(filter),
            Command::Suggest => self
                .session
                .suggestions()
                .iter()
                .enumerate()
                .map(|(i, s)| format!("  {}. {}", i + 1, s))
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Pick(index) => {
                let sent = self.session.choose_suggestion(index).await;
                self.render_send(sent).await
            }
            Command::Query(text) => {
                let sent = self.session.send(&text).await;
                self.render_send(sent).await
            }
        };
        Outcome::Continue(out)
    }

    fn apply_filter(&mut self, filter: Option<DashboardFilter>) -> String {
        let active = match filter {
            Some(f) => self.workbench.toggle_filter(f),
            None => {
                self.workbench.clear_filter();
                None
            }
        };
        let cases = self.workbench.filtered();
        match active {
            Some(f) => format!("Filter {:?}: {} case(s)", f, cases.len()),
            None => format!("Filter cleared: {} case(s)", cases.len()),
        }
    }

    fn show_case(&self, number: Option<&str>) -> String {
        match number {
            Some(number) => match self.workbench.get(number) {
                Ok(case) => render_case(case),
                Err(e) => e.to_string(),
            },
            None => match self.workbench.selected() {
                Some(case) => render_case(&case),
                None => "No case selected. Use /select <case> or /show <case>.".to_string(),
            },
        }
    }

    async fn render_send(
        &self,
        sent: Result<ChatMessage, SendRejected>,
    ) -> String {
        let answer = match sent {
            Ok(answer) => answer,
            Err(e) => return format!("Not sent: {}", e),
        };
        if self.session.is_open().await {
            render_message(&answer)
        } else {
            format!(
                "(reply received while the panel is hidden; {} unread, /open to read)",
                self.session.unread().await
            )
        }
    }

    /// Read commands from stdin until EOF or `/quit`.
    pub async fn run(mut self) -> std::io::Result<()> {
        let mut events = self.session.subscribe();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::LoadingChanged(true)) => eprintln!("⏳ Analyzing..."),
                    Ok(SessionEvent::UnreadChanged(n)) if n > 0 => eprintln!("🔔 {} unread", n),
                    Ok(_) => {}
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }
        });

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        eprint!("> ");
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                eprint!("> ");
                continue;
            }
            match self.handle(CommandParser::parse(&line)).await {
                Outcome::Quit => break,
                Outcome::Continue(out) => println!("\n{}\n", out),
            }
            eprint!("> ");
        }
        Ok(())
    }
}

/// One transcript entry as shown in the panel.
pub fn render_message(msg: &ChatMessage) -> String {
    let who = match msg.role {
        Role::User => "You",
        Role::Assistant if msg.is_error() => "Assistant (error)",
        Role::Assistant => "Assistant",
    };
    let mut out = format!("[{}] {}:\n{}", msg.local_time(), who, msg.content);
    let refs = msg.referenced_cases();
    if !refs.is_empty() {
        let _ = write!(out, "\nReferenced cases: {}", refs.join(", "));
    }
    out
}

fn render_case_list(cases: &[&Case]) -> String {
    cases
        .iter()
        .map(|c| {
            format!(
                "  {}  {:<11} {:<8} {:<10} {}: {}",
                c.case_number,
                c.status.to_string(),
                c.priority.to_string(),
                c.case_type.as_str(),
                c.party.full_name,
                c.summary()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
