// App state and main event loop.
// Owns the tab router, the hand-off slot, the gallery store, and the channel
// that spawned AI tasks report back through.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use crate::ai::AiClient;
use crate::error::StyloError;
use crate::gallery::GalleryStore;
use crate::media::ImageFile;
use crate::state::{
    ConsoleMessage, GalleryTabState, GenerationOutput, ImageSlots, WorkflowKind, WorkflowState,
};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Generate,
    Edit,
    StyleTransfer,
    Outfit,
    ProductScene,
    Video,
    Gallery,
    Console,
}

impl Tab {
    pub const ALL: [Tab; 8] = [
        Tab::Generate,
        Tab::Edit,
        Tab::StyleTransfer,
        Tab::Outfit,
        Tab::ProductScene,
        Tab::Video,
        Tab::Gallery,
        Tab::Console,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Generate => "Generate",
            Tab::Edit => "Edit",
            Tab::StyleTransfer => "Style",
            Tab::Outfit => "Outfit Studio",
            Tab::ProductScene => "Product Scene",
            Tab::Video => "Video",
            Tab::Gallery => "Gallery",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let i = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// The workflow shown on this tab, if it is a workflow tab.
    pub fn workflow_kind(&self) -> Option<WorkflowKind> {
        match self {
            Tab::Generate => Some(WorkflowKind::Generate),
            Tab::Edit => Some(WorkflowKind::Edit),
            Tab::StyleTransfer => Some(WorkflowKind::StyleTransfer),
            Tab::Outfit => Some(WorkflowKind::Outfit),
            Tab::ProductScene => Some(WorkflowKind::ProductScene),
            Tab::Video => Some(WorkflowKind::Video),
            Tab::Gallery | Tab::Console => None,
        }
    }
}

/// Events sent from spawned AI tasks back to the event loop. Every event
/// carries the sequence number its request was issued with so stale
/// completions can be dropped.
#[derive(Debug)]
pub enum AppEvent {
    Progress {
        kind: WorkflowKind,
        seq: u64,
        message: String,
    },
    Completed {
        kind: WorkflowKind,
        seq: u64,
        result: std::result::Result<GenerationOutput, String>,
    },
    Enhanced {
        kind: WorkflowKind,
        seq: u64,
        result: std::result::Result<String, String>,
    },
}

/// What keyboard input currently feeds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the active workflow's prompt field.
    EditingPrompt,
    /// Typing a file path into the attach-image modal.
    AttachingImage {
        input: String,
    },
}

/// Main application state.
pub struct App {
    /// Currently active tab.
    pub active_tab: Tab,
    /// One state machine per workflow tab.
    pub generate: WorkflowState,
    pub edit: WorkflowState,
    pub style_transfer: WorkflowState,
    pub outfit: WorkflowState,
    pub product_scene: WorkflowState,
    pub video: WorkflowState,
    /// Persisted gallery of saved creations.
    pub gallery_store: GalleryStore,
    /// Gallery tab selection/detail/confirm state.
    pub gallery: GalleryTabState,
    /// Single-item channel carrying a result image into the video workflow.
    pub handoff: Option<ImageFile>,
    /// AI client; None until a key is configured.
    pub client: Option<Arc<AiClient>>,
    /// Activity log messages.
    pub console_messages: Vec<ConsoleMessage>,
    /// Number of unread console warnings/errors (for badge).
    pub console_unread: usize,
    pub console_list_state: ListState,
    /// Current keyboard input mode.
    pub input_mode: InputMode,
    /// Whether the app should exit.
    pub should_quit: bool,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(client: Option<AiClient>, gallery_path: PathBuf) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (gallery_store, warning) = GalleryStore::load(gallery_path);

        let mut app = Self {
            active_tab: Tab::default(),
            generate: WorkflowState::new(WorkflowKind::Generate),
            edit: WorkflowState::new(WorkflowKind::Edit),
            style_transfer: WorkflowState::new(WorkflowKind::StyleTransfer),
            outfit: WorkflowState::new(WorkflowKind::Outfit),
            product_scene: WorkflowState::new(WorkflowKind::ProductScene),
            video: WorkflowState::new(WorkflowKind::Video),
            gallery_store,
            gallery: GalleryTabState::new(),
            handoff: None,
            client: client.map(Arc::new),
            console_messages: Vec::new(),
            console_unread: 0,
            console_list_state: ListState::default(),
            input_mode: InputMode::default(),
            should_quit: false,
            events_tx,
            events_rx,
        };

        if let Some(warning) = warning {
            app.log_warn(warning);
        }
        if app.client.is_none() {
            app.log_warn("No API key configured; set GEMINI_API_KEY to enable generation");
        }
        app
    }

    pub fn workflow(&self, kind: WorkflowKind) -> &WorkflowState {
        match kind {
            WorkflowKind::Generate => &self.generate,
            WorkflowKind::Edit => &self.edit,
            WorkflowKind::StyleTransfer => &self.style_transfer,
            WorkflowKind::Outfit => &self.outfit,
            WorkflowKind::ProductScene => &self.product_scene,
            WorkflowKind::Video => &self.video,
        }
    }

    pub fn workflow_mut(&mut self, kind: WorkflowKind) -> &mut WorkflowState {
        match kind {
            WorkflowKind::Generate => &mut self.generate,
            WorkflowKind::Edit => &mut self.edit,
            WorkflowKind::StyleTransfer => &mut self.style_transfer,
            WorkflowKind::Outfit => &mut self.outfit,
            WorkflowKind::ProductScene => &mut self.product_scene,
            WorkflowKind::Video => &mut self.video,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            self.drain_events();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply any completed/progress events from spawned AI tasks.
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                AppEvent::Progress { kind, seq, message } => {
                    self.workflow_mut(kind).apply_progress(seq, message);
                }
                AppEvent::Completed { kind, seq, result } => {
                    // Superseded requests make no noise in the console either.
                    if seq == self.workflow(kind).seq() {
                        if let Err(message) = &result {
                            self.log_error(format!("{}: {}", kind.title(), message));
                        }
                    }
                    self.workflow_mut(kind).apply_result(seq, result);
                }
                AppEvent::Enhanced { kind, seq, result } => {
                    if seq == self.workflow(kind).seq() {
                        if let Err(message) = &result {
                            self.log_error(format!("{}: {}", kind.title(), message));
                        }
                    }
                    self.workflow_mut(kind).apply_enhanced(seq, result);
                }
            }
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.input_mode.clone() {
            InputMode::EditingPrompt => self.handle_prompt_key(key),
            InputMode::AttachingImage { input } => self.handle_attach_key(key, input),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        let Some(kind) = self.active_tab.workflow_kind() else {
            self.input_mode = InputMode::Normal;
            return;
        };
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.input_mode = InputMode::Normal,
            KeyCode::Backspace => {
                self.workflow_mut(kind).prompt.pop();
            }
            KeyCode::Char(c) => self.workflow_mut(kind).prompt.push(c),
            _ => {}
        }
    }

    fn handle_attach_key(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.attach_image_from(input);
            }
            KeyCode::Backspace => {
                input.pop();
                self.input_mode = InputMode::AttachingImage { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.input_mode = InputMode::AttachingImage { input };
            }
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return;
            }
            KeyCode::Tab => {
                self.switch_to(self.active_tab.next());
                return;
            }
            KeyCode::BackTab => {
                self.switch_to(self.active_tab.prev());
                return;
            }
            _ => {}
        }

        match self.active_tab {
            Tab::Gallery => self.handle_gallery_key(key),
            Tab::Console => self.handle_console_key(key),
            _ => {
                if let Some(kind) = self.active_tab.workflow_kind() {
                    self.handle_workflow_key(key, kind);
                }
            }
        }
    }

    fn handle_workflow_key(&mut self, key: KeyEvent, kind: WorkflowKind) {
        // Inputs are frozen while a request is in flight.
        if self.workflow(kind).is_requesting() {
            return;
        }
        match key.code {
            KeyCode::Char('p') | KeyCode::Char('i') => self.input_mode = InputMode::EditingPrompt,
            KeyCode::Char('a') => {
                if !self.workflow(kind).slots.is_empty() {
                    self.input_mode = InputMode::AttachingImage {
                        input: String::new(),
                    };
                }
            }
            KeyCode::Char('n') => self.workflow_mut(kind).next_slot(),
            KeyCode::Char('x') => self.workflow_mut(kind).clear_active_slot(),
            KeyCode::Char('r') if kind.offers_aspect_ratio() => {
                self.workflow_mut(kind).cycle_aspect_ratio()
            }
            KeyCode::Enter | KeyCode::Char('g') => self.start_generation(kind),
            KeyCode::Char('e') if kind.offers_enhance() => self.start_enhance(kind),
            KeyCode::Char('s') => self.save_result(kind),
            KeyCode::Char('c') if kind.offers_handoff() => self.handoff_to_video(kind),
            _ => {}
        }
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) {
        // Confirmation modal swallows all input until resolved.
        if self.gallery.confirm_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.delete_confirmed(),
                KeyCode::Char('n') | KeyCode::Esc => self.gallery.cancel_delete(),
                _ => {}
            }
            return;
        }

        let len = self.gallery_store.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.gallery.select_next(len),
            KeyCode::Up | KeyCode::Char('k') => self.gallery.select_prev(len),
            KeyCode::Enter => {
                if let Some(id) = self.selected_gallery_id() {
                    self.gallery.open_detail(id);
                }
            }
            KeyCode::Esc => self.gallery.close_detail(),
            KeyCode::Char('d') => {
                let target = self
                    .gallery
                    .detail
                    .clone()
                    .or_else(|| self.selected_gallery_id());
                if let Some(id) = target {
                    self.gallery.request_delete(id);
                }
            }
            KeyCode::Char('x') => self.export_selected(),
            _ => {}
        }
    }

    fn handle_console_key(&mut self, key: KeyEvent) {
        let len = self.console_messages.len();
        if len == 0 {
            return;
        }
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                let i = match self.console_list_state.selected() {
                    Some(i) if i + 1 < len => i + 1,
                    Some(i) => i,
                    None => 0,
                };
                self.console_list_state.select(Some(i));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = match self.console_list_state.selected() {
                    Some(0) | None => 0,
                    Some(i) => i - 1,
                };
                self.console_list_state.select(Some(i));
            }
            _ => {}
        }
    }

    /// Switch tabs, enforcing the hand-off rule: the slot survives only a
    /// switch to the video workflow, where it pre-fills the starting image.
    pub fn switch_to(&mut self, tab: Tab) {
        if tab == Tab::Video {
            if let Some(slot) = self.video.slots.first_mut() {
                slot.images = ImageSlots::Single(self.handoff.clone());
            }
        } else {
            self.handoff = None;
        }
        self.active_tab = tab;
        if tab == Tab::Console {
            self.console_unread = 0;
        }
    }

    /// Push the active workflow's result image into the hand-off slot and
    /// jump to the video workflow.
    pub fn handoff_to_video(&mut self, kind: WorkflowKind) {
        let Some(image) = self.workflow(kind).result_image().cloned() else {
            return;
        };
        self.handoff = Some(image);
        self.switch_to(Tab::Video);
    }

    /// Validate and kick off a generation request for the given workflow.
    /// Validation failures and a missing key short-circuit without spawning.
    pub fn start_generation(&mut self, kind: WorkflowKind) {
        if self.workflow(kind).is_requesting() {
            return;
        }
        if let Err(message) = self.workflow(kind).validate() {
            self.workflow_mut(kind).fail_validation(message);
            return;
        }
        let Some(client) = self.client.clone() else {
            self.workflow_mut(kind)
                .fail_validation(StyloError::MissingKey.to_string());
            return;
        };

        let message = match kind {
            WorkflowKind::Video => "Warming up the video model",
            _ => "Generating",
        };
        let workflow = self.workflow_mut(kind);
        let seq = workflow.begin_request(message);
        let prompt = workflow.prompt.clone();
        let aspect_ratio = workflow.aspect_ratio;
        let slot_images: Vec<Vec<ImageFile>> = workflow
            .slots
            .iter()
            .map(|slot| match &slot.images {
                ImageSlots::Single(image) => image.iter().cloned().collect(),
                ImageSlots::Multiple(images) => images.clone(),
            })
            .collect();

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = run_generation(client, kind, prompt, aspect_ratio, slot_images, {
                let tx = tx.clone();
                move |message| {
                    let _ = tx.send(AppEvent::Progress { kind, seq, message });
                }
            })
            .await
            .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Completed { kind, seq, result });
        });
    }

    /// Kick off prompt enhancement for the given workflow.
    pub fn start_enhance(&mut self, kind: WorkflowKind) {
        let workflow = self.workflow(kind);
        if workflow.is_requesting() || workflow.prompt.trim().is_empty() {
            return;
        }
        let Some(client) = self.client.clone() else {
            self.workflow_mut(kind)
                .fail_validation(StyloError::MissingKey.to_string());
            return;
        };

        let workflow = self.workflow_mut(kind);
        let seq = workflow.begin_request("Enhancing prompt");
        let prompt = workflow.prompt.clone();

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = client
                .enhance_prompt(&prompt)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AppEvent::Enhanced { kind, seq, result });
        });
    }

    /// Promote the held result into the gallery. Idempotent after the first
    /// call per result.
    pub fn save_result(&mut self, kind: WorkflowKind) {
        let Some((image, prompt)) = self.workflow_mut(kind).mark_saved() else {
            return;
        };
        let (_, warning) = self.gallery_store.append(image, prompt);
        if let Some(warning) = warning {
            self.log_warn(warning);
        }
        self.log_info("Saved to gallery");
    }

    /// Delete the entry awaiting confirmation.
    fn delete_confirmed(&mut self) {
        let Some(id) = self.gallery.take_confirmed_delete() else {
            return;
        };
        let (removed, warning) = self.gallery_store.remove(&id);
        if let Some(warning) = warning {
            self.log_warn(warning);
        }
        if removed {
            self.gallery.notify_removed(&id, self.gallery_store.len());
            self.log_info("Deleted gallery entry");
        }
    }

    /// Write the selected entry's decoded bytes next to the working
    /// directory.
    fn export_selected(&mut self) {
        let Some(id) = self
            .gallery
            .detail
            .clone()
            .or_else(|| self.selected_gallery_id())
        else {
            return;
        };
        let Some(entry) = self.gallery_store.get(&id) else {
            return;
        };
        let filename = format!("stylosphere-{}.{}", entry.id, crate::media::extension_for_mime(&entry.image.mime_type));
        match entry.image.decode() {
            Ok(bytes) => match std::fs::write(&filename, bytes) {
                Ok(()) => self.log_info(format!("Exported {}", filename)),
                Err(e) => self.log_error(format!("Export failed: {}", e)),
            },
            Err(e) => self.log_error(format!("Export failed: {}", e)),
        }
    }

    fn selected_gallery_id(&self) -> Option<String> {
        let index = self.gallery.list_state.selected()?;
        self.gallery_store
            .images()
            .get(index)
            .map(|entry| entry.id.clone())
    }

    fn attach_image_from(&mut self, input: String) {
        let Some(kind) = self.active_tab.workflow_kind() else {
            return;
        };
        let path = PathBuf::from(input.trim());
        match ImageFile::from_path(&path) {
            Ok(image) => {
                self.workflow_mut(kind).attach_image(image);
            }
            Err(e) => self.log_error(format!("Could not attach image: {}", e)),
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.console_messages.push(ConsoleMessage::info(message));
    }

    pub fn log_warn(&mut self, message: impl Into<String>) {
        self.console_messages.push(ConsoleMessage::warn(message));
        self.bump_console_badge();
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.console_messages.push(ConsoleMessage::error(message));
        self.bump_console_badge();
    }

    fn bump_console_badge(&mut self) {
        if self.active_tab != Tab::Console {
            self.console_unread += 1;
        }
    }
}

/// Dispatch one generation request to the right AI operation. Slot images
/// arrive in form order; validation has already checked the required ones.
async fn run_generation(
    client: Arc<AiClient>,
    kind: WorkflowKind,
    prompt: String,
    aspect_ratio: crate::ai::AspectRatio,
    slot_images: Vec<Vec<ImageFile>>,
    progress: impl Fn(String),
) -> crate::error::Result<GenerationOutput> {
    fn single(slots: &[Vec<ImageFile>], index: usize) -> crate::error::Result<&ImageFile> {
        slots
            .get(index)
            .and_then(|images| images.first())
            .ok_or_else(|| StyloError::Other("Missing image input".to_string()))
    }

    match kind {
        WorkflowKind::Generate => {
            let image = client.generate_image(&prompt, aspect_ratio).await?;
            Ok(GenerationOutput::Image(image))
        }
        WorkflowKind::Edit => {
            let image = client.edit_image(&prompt, single(&slot_images, 0)?, aspect_ratio).await?;
            Ok(GenerationOutput::Image(image))
        }
        WorkflowKind::StyleTransfer => {
            let image = client
                .transfer_style(
                    &prompt,
                    single(&slot_images, 0)?,
                    single(&slot_images, 1)?,
                    aspect_ratio,
                )
                .await?;
            Ok(GenerationOutput::Image(image))
        }
        WorkflowKind::Outfit => {
            let clothing = slot_images.get(1).cloned().unwrap_or_default();
            let image = client
                .create_outfit(&prompt, single(&slot_images, 0)?, &clothing, aspect_ratio)
                .await?;
            Ok(GenerationOutput::Image(image))
        }
        WorkflowKind::ProductScene => {
            let image = client
                .create_product_scene(&prompt, single(&slot_images, 0)?, single(&slot_images, 1)?)
                .await?;
            Ok(GenerationOutput::Image(image))
        }
        WorkflowKind::Video => {
            let url = client
                .generate_video(&prompt, Some(single(&slot_images, 0)?), aspect_ratio, progress)
                .await?;
            Ok(GenerationOutput::Video(url))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WorkflowPhase;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        App::new(None, dir.path().join("gallery.json"))
    }

    fn image(name: &str) -> ImageFile {
        ImageFile::from_inline("QUJD".into(), "image/png".into(), name.into())
    }

    fn succeed(workflow: &mut WorkflowState, name: &str) {
        let seq = workflow.begin_request("Generating");
        workflow.apply_result(seq, Ok(GenerationOutput::Image(image(name))));
    }

    #[test]
    fn test_tab_cycle_is_complete() {
        let mut tab = Tab::default();
        for _ in 0..Tab::ALL.len() {
            tab = tab.next();
        }
        assert_eq!(tab, Tab::default());
        assert_eq!(tab.next().prev(), tab);
    }

    #[test]
    fn test_validation_failure_before_any_request() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.edit.prompt = "add a hat".to_string();
        app.start_generation(WorkflowKind::Edit);

        match &app.edit.phase {
            WorkflowPhase::Failed(message) => {
                assert_eq!(message, "Missing required field: Source image");
            }
            other => panic!("unexpected phase: {:?}", other),
        }
        // Sequence untouched: nothing was spawned.
        assert_eq!(app.edit.seq(), 0);
    }

    #[test]
    fn test_missing_key_is_distinguishable() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.generate.prompt = "a red bicycle".to_string();
        app.start_generation(WorkflowKind::Generate);

        match &app.generate.phase {
            WorkflowPhase::Failed(message) => assert!(message.contains("GEMINI_API_KEY")),
            other => panic!("unexpected phase: {:?}", other),
        }
    }

    #[test]
    fn test_handoff_reaches_video_and_clears_on_detour() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.outfit.prompt = "streetwear".to_string();
        succeed(&mut app.outfit, "outfit.png");

        app.handoff_to_video(WorkflowKind::Outfit);
        assert_eq!(app.active_tab, Tab::Video);
        match &app.video.slots[0].images {
            ImageSlots::Single(Some(start)) => assert_eq!(start.name, "outfit.png"),
            other => panic!("starting image not pre-filled: {:?}", other),
        }

        // Detour through the gallery clears the slot; coming back to video
        // the starting image is gone.
        app.switch_to(Tab::Gallery);
        assert!(app.handoff.is_none());
        app.switch_to(Tab::Video);
        assert!(app.video.slots[0].images.is_empty());
    }

    #[test]
    fn test_switching_to_video_keeps_handoff() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.handoff = Some(image("held.png"));
        app.switch_to(Tab::Video);
        assert!(app.handoff.is_some());
        match &app.video.slots[0].images {
            ImageSlots::Single(Some(start)) => assert_eq!(start.name, "held.png"),
            other => panic!("starting image not pre-filled: {:?}", other),
        }
    }

    #[test]
    fn test_save_twice_stores_once() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.generate.prompt = "a red bicycle".to_string();
        succeed(&mut app.generate, "bike.png");

        app.save_result(WorkflowKind::Generate);
        app.save_result(WorkflowKind::Generate);

        assert_eq!(app.gallery_store.len(), 1);
        assert_eq!(app.gallery_store.images()[0].prompt, "a red bicycle");
        // Result is still displayed after saving.
        assert!(app.generate.result_image().is_some());
    }

    #[test]
    fn test_confirmed_delete_removes_and_closes_detail() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        let (id, _) = app.gallery_store.append(image("a.png"), "prompt".into());
        app.gallery.select_next(1);
        app.gallery.open_detail(id.clone());
        app.gallery.request_delete(id.clone());

        app.delete_confirmed();

        assert!(app.gallery_store.is_empty());
        assert!(app.gallery.detail.is_none());
        assert_eq!(app.gallery.list_state.selected(), None);
    }

    #[test]
    fn test_product_scene_ratio_key_is_inert() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        let before = app.product_scene.aspect_ratio;
        app.handle_workflow_key(
            KeyEvent::from(KeyCode::Char('r')),
            WorkflowKind::ProductScene,
        );
        assert_eq!(app.product_scene.aspect_ratio, before);

        // Other workflows still cycle.
        let before = app.generate.aspect_ratio;
        app.handle_workflow_key(KeyEvent::from(KeyCode::Char('r')), WorkflowKind::Generate);
        assert_ne!(app.generate.aspect_ratio, before);
    }

    #[test]
    fn test_stale_failure_is_not_logged() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);

        app.generate.prompt = "a red bicycle".to_string();
        let stale = app.generate.begin_request("Generating");
        let current = app.generate.begin_request("Generating");

        app.events_tx
            .send(AppEvent::Completed {
                kind: WorkflowKind::Generate,
                seq: stale,
                result: Err("quota exceeded".to_string()),
            })
            .unwrap();
        let before = app.console_messages.len();
        app.drain_events();
        assert_eq!(app.console_messages.len(), before);
        assert!(app.generate.is_requesting());

        app.events_tx
            .send(AppEvent::Completed {
                kind: WorkflowKind::Generate,
                seq: current,
                result: Err("quota exceeded".to_string()),
            })
            .unwrap();
        app.drain_events();
        assert_eq!(app.console_messages.len(), before + 1);
    }

    #[test]
    fn test_console_badge_counts_unread() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = test_app(&temp_dir);
        let unread_at_start = app.console_unread;

        app.log_error("something failed");
        assert_eq!(app.console_unread, unread_at_start + 1);

        app.switch_to(Tab::Console);
        assert_eq!(app.console_unread, 0);

        // Viewing the console keeps the badge clear.
        app.log_error("another failure");
        assert_eq!(app.console_unread, 0);
    }
}
