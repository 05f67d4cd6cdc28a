use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::Editor;
use rustyline::history::DefaultHistory;

use parley_application::{ChatUseCase, SimulatedReplyBackend};
use parley_core::ParleyError;
use parley_core::conversation::MessageRole;
use parley_core::markdown;
use parley_core::notice::Notice;
use parley_core::state::ChatStateRepository;
use parley_core::store::ConversationStore;
use parley_infrastructure::{
    ConfigService, ImageLoader, JsonStateRepository, MemoryStateRepository, ParleyPaths,
};
use parley_views::{RenameDialog, page};

mod command;
mod display;
mod helper;
mod logging;

use command::{Command, HELP};
use helper::CliHelper;

type Repl = Editor<CliHelper, DefaultHistory>;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley - chat with a simulated assistant from the terminal", long_about = None)]
struct Cli {
    /// Keep conversations in memory only; nothing is read or written
    #[arg(long)]
    ephemeral: bool,

    /// Keep config, chat state and logs under this directory
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

/// Command handlers over the chat use case.
struct Shell {
    chat: Arc<ChatUseCase>,
    images: ImageLoader,
    /// Most recent notice; `/export` renders it as the page toast.
    last_notice: Mutex<Option<Notice>>,
}

impl Shell {
    fn new(chat: Arc<ChatUseCase>, images: ImageLoader) -> Self {
        Self {
            chat,
            images,
            last_notice: Mutex::new(None),
        }
    }

    async fn run(&self, command: Command, rl: &mut Repl) {
        match command {
            Command::Message(text) => self.send(text).await,
            Command::New => match self.chat.new_chat().await {
                Ok(notice) => {
                    self.notify(notice);
                    self.show_active();
                }
                Err(e) => self.report(&e),
            },
            Command::List => display::print_list(&self.chat.snapshot()),
            Command::Select(n) => {
                let Some(id) = self.id_at(n) else { return };
                match self.chat.select_chat(&id).await {
                    Ok(()) => self.show_active(),
                    Err(e) => self.report(&e),
                }
            }
            Command::Rename(n, title) => self.rename(n, title, rl).await,
            Command::Delete(n) => self.delete(n, rl).await,
            Command::Image(path) => self.attach(&path).await,
            Command::ClearImage => match self.chat.clear_image().await {
                Ok(()) => self.notify(Notice::info("Image removed")),
                Err(e) => self.report(&e),
            },
            Command::ToggleGeneration => match self.chat.toggle_image_generation().await {
                Ok(true) => self.notify(Notice::info("Image Generation Mode on")),
                Ok(false) => self.notify(Notice::info("Image Generation Mode off")),
                Err(e) => self.report(&e),
            },
            Command::Voice => self.notify(self.chat.record_voice()),
            Command::Tts => self.notify(self.chat.play_tts()),
            Command::Code => self.code_blocks(),
            Command::Export(path) => self.export(&path).await,
            Command::Help => println!("{}", HELP.bright_black()),
            Command::Quit => {}
        }
    }

    async fn send(&self, text: String) {
        self.chat.set_draft(text).await;
        let handle = match self.chat.send().await {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                if self.chat.snapshot().is_processing {
                    println!("{}", "Still waiting for the last reply...".bright_black());
                }
                return;
            }
            Err(e) => return self.report(&e),
        };

        let origin = self.chat.snapshot().active_id.clone();
        println!("{}", "...".bright_black());

        let chat = self.chat.clone();
        tokio::spawn(async move {
            if handle.await.is_err() {
                return;
            }
            let state = chat.snapshot();
            let Some(conversation) = state.find(&origin) else {
                return;
            };
            let Some(reply) = conversation.messages.last() else {
                return;
            };
            if reply.role != MessageRole::Assistant {
                return;
            }
            if origin != state.active_id {
                println!(
                    "{}",
                    format!("[{}]", conversation.title).bright_magenta()
                );
            }
            display::print_message(reply);
        });
    }

    async fn rename(&self, n: usize, title: String, rl: &mut Repl) {
        let Some(id) = self.id_at(n) else { return };
        let mut dialog = match RenameDialog::open(&self.chat.snapshot(), &id) {
            Ok(dialog) => dialog,
            Err(e) => return self.report(&e),
        };

        // Without a title, edit the current one in place.
        if title.trim().is_empty() {
            match rl.readline_with_initial("Rename: ", (dialog.title.as_str(), "")) {
                Ok(input) => dialog.title = input,
                Err(_) => return,
            }
        } else {
            dialog.title = title;
        }

        let Some(title) = dialog.submission() else {
            return;
        };
        match self.chat.rename_chat(&dialog.conversation_id, title).await {
            Ok(notice) => self.notify(notice),
            Err(e) => self.report(&e),
        }
    }

    async fn delete(&self, n: usize, rl: &mut Repl) {
        let state = self.chat.snapshot();
        let Some(conversation) = display::conversation_at(&state, n) else {
            return self.no_chat_at(n);
        };

        // Deleting the last chat is refused by the store; skip the prompt.
        if state.conversations.len() > 1 {
            let prompt = format!("Delete \"{}\"? [y/N] ", conversation.title);
            let confirmed = rl
                .readline(&prompt)
                .map(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
                .unwrap_or(false);
            if !confirmed {
                return;
            }
        }

        match self.chat.delete_chat(&conversation.id).await {
            Ok(notice) => self.notify(notice),
            Err(e) => self.report(&e),
        }
    }

    async fn attach(&self, path: &Path) {
        let image = match self.images.load(path).await {
            Ok(image) => image,
            Err(e) => return self.report(&e),
        };
        let summary = format!(
            "Image attached: {} ({} KB)",
            path.display(),
            image.size_bytes.div_ceil(1024)
        );
        match self.chat.attach_image(image).await {
            Ok(()) => self.notify(Notice::info(summary)),
            Err(e) => self.report(&e),
        }
    }

    fn code_blocks(&self) {
        let state = self.chat.snapshot();
        let blocks = state
            .active()
            .ok()
            .and_then(|c| c.last_assistant_message())
            .map(|m| markdown::code_blocks(&m.text))
            .unwrap_or_default();

        if blocks.is_empty() {
            println!("{}", "No code blocks in the last reply".bright_black());
            return;
        }
        for (i, block) in blocks.iter().enumerate() {
            let language = block.language.as_deref().unwrap_or("text");
            println!("{}", format!("--- [{}] {} ---", i + 1, language).bright_black());
            print!("{}", block.code);
        }
    }

    async fn export(&self, path: &Path) {
        let state = self.chat.snapshot();
        let composer = self.chat.composer().await;
        let notice = self
            .last_notice
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let html = page::render(&state, &composer, notice.as_ref());

        match tokio::fs::write(path, html).await {
            Ok(()) => self.notify(Notice::success(format!(
                "Exported to {}",
                path.display()
            ))),
            Err(e) => self.report(&ParleyError::from(e)),
        }
    }

    fn id_at(&self, n: usize) -> Option<String> {
        let state = self.chat.snapshot();
        match display::conversation_at(&state, n) {
            Some(conversation) => Some(conversation.id.clone()),
            None => {
                self.no_chat_at(n);
                None
            }
        }
    }

    fn show_active(&self) {
        if let Ok(conversation) = self.chat.snapshot().active() {
            display::print_conversation(conversation);
        }
    }

    fn notify(&self, notice: Notice) {
        display::print_notice(&notice);
        *self
            .last_notice
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(notice);
    }

    fn report(&self, err: &ParleyError) {
        tracing::debug!("[parley] Command failed: {}", err);
        if let Some(notice) = Notice::from_error(err) {
            self.notify(notice);
        }
    }

    fn no_chat_at(&self, n: usize) {
        self.notify(Notice::error(format!(
            "No chat at position {} (see /list)",
            n
        )));
    }
}

fn resolve_paths(cli: &Cli) -> Result<(ParleyPaths, ConfigService)> {
    if let Some(dir) = &cli.data_dir {
        let paths = ParleyPaths::rooted_at(dir);
        let config = ConfigService::new(paths.config_file());
        return Ok((paths, config));
    }

    let paths = ParleyPaths::discover()?;
    let config = ConfigService::new(paths.config_file());
    let data_dir = config.get_config().storage.data_dir;
    Ok((paths.with_data_dir(data_dir), config))
}

/// Entry point for the Parley REPL.
///
/// Loads configuration, installs file logging, restores the chat state and
/// reads commands until `quit` or EOF. Replies are printed by background
/// tasks as they land.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ===== Configuration & Logging =====
    let (paths, config_service) = resolve_paths(&cli)?;
    let config = config_service.get_config();
    let _log_guard = logging::init(&paths.logs_dir(), &config.logging.filter)?;
    tracing::info!(
        "[parley] Starting (data dir {:?}, ephemeral: {})",
        paths.data_dir(),
        cli.ephemeral
    );

    // ===== Backend Initialization =====
    let repository: Arc<dyn ChatStateRepository> = if cli.ephemeral {
        Arc::new(MemoryStateRepository::new())
    } else {
        Arc::new(JsonStateRepository::new(paths.state_file()))
    };
    let store = Arc::new(ConversationStore::open(repository).await);
    let backend = Arc::new(SimulatedReplyBackend::new(config.replies.clone()));
    let shell = Shell::new(
        Arc::new(ChatUseCase::new(store, backend)),
        ImageLoader::new(&config.attachments),
    );

    // ===== REPL Setup =====
    let mut rl: Repl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== Parley ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a message to chat, '/help' for commands, or 'quit' to exit.".bright_black()
    );
    println!();
    shell.show_active();

    // ===== Main REPL Loop =====
    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                match Command::parse(trimmed) {
                    Ok(Command::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(command) => shell.run(command, &mut rl).await,
                    Err(usage) => eprintln!("{}", usage.red()),
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    tracing::info!("[parley] Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_application::chat::VOICE_RECORDING_NOTICE;
    use parley_core::config::{AttachmentConfig, ReplyConfig};
    use tempfile::TempDir;

    async fn shell() -> Shell {
        let store = ConversationStore::open(Arc::new(MemoryStateRepository::new())).await;
        let backend = SimulatedReplyBackend::new(ReplyConfig::default());
        Shell::new(
            Arc::new(ChatUseCase::new(Arc::new(store), Arc::new(backend))),
            ImageLoader::new(&AttachmentConfig::default()),
        )
    }

    #[tokio::test]
    async fn test_export_shows_last_notice_as_toast() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat.html");
        let shell = shell().await;

        shell.notify(shell.chat.record_voice());
        shell.export(&path).await;

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(html.contains("<div class=\"toast info\" role=\"status\">"));
        assert!(html.contains(VOICE_RECORDING_NOTICE));
        assert!(html.contains("<dialog class=\"rename-dialog\">"));
    }

    #[tokio::test]
    async fn test_export_without_notice_has_no_toast() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("chat.html");
        let shell = shell().await;

        shell.export(&path).await;

        let html = std::fs::read_to_string(&path).unwrap();
        assert!(!html.contains("class=\"toast"));
    }

    #[tokio::test]
    async fn test_missing_chat_position_is_reported() {
        let shell = shell().await;
        assert!(shell.id_at(7).is_none());

        let notice = shell.last_notice.lock().unwrap().clone().unwrap();
        assert_eq!(notice.text, "No chat at position 7 (see /list)");
    }
}
