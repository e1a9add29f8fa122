// Generation workflow state machine.
// One current-phase value per workflow instance instead of loose boolean
// flags, so invalid combinations (loading and saved at once) cannot exist.

use crate::ai::AspectRatio;
use crate::media::ImageFile;

/// The six tabbed workflows, each wrapping one AI capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Generate,
    Edit,
    StyleTransfer,
    Outfit,
    ProductScene,
    Video,
}

impl WorkflowKind {
    pub fn title(&self) -> &'static str {
        match self {
            WorkflowKind::Generate => "Generate",
            WorkflowKind::Edit => "Edit",
            WorkflowKind::StyleTransfer => "Style",
            WorkflowKind::Outfit => "Outfit Studio",
            WorkflowKind::ProductScene => "Product Scene",
            WorkflowKind::Video => "Video",
        }
    }

    /// Whether this workflow needs a non-empty prompt.
    pub fn requires_prompt(&self) -> bool {
        !matches!(self, WorkflowKind::StyleTransfer)
    }

    /// Whether this workflow can push its result into the video workflow.
    pub fn offers_handoff(&self) -> bool {
        matches!(
            self,
            WorkflowKind::Outfit | WorkflowKind::ProductScene | WorkflowKind::StyleTransfer
        )
    }

    /// Whether prompt enhancement is offered (text-to-image only).
    pub fn offers_enhance(&self) -> bool {
        matches!(self, WorkflowKind::Generate)
    }

    /// Whether the aspect ratio is user-selectable. Product scenes are
    /// always composed square, so the control is hidden there.
    pub fn offers_aspect_ratio(&self) -> bool {
        !matches!(self, WorkflowKind::ProductScene)
    }
}

/// Image input slots: either one optional image or an open-ended list.
#[derive(Debug, Clone)]
pub enum ImageSlots {
    Single(Option<ImageFile>),
    Multiple(Vec<ImageFile>),
}

impl ImageSlots {
    pub fn is_empty(&self) -> bool {
        match self {
            ImageSlots::Single(image) => image.is_none(),
            ImageSlots::Multiple(images) => images.is_empty(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            ImageSlots::Single(image) => image.iter().count(),
            ImageSlots::Multiple(images) => images.len(),
        }
    }

    /// Place an image: replaces a single slot, appends to a multiple slot.
    pub fn attach(&mut self, image: ImageFile) {
        match self {
            ImageSlots::Single(slot) => *slot = Some(image),
            ImageSlots::Multiple(images) => images.push(image),
        }
    }

    pub fn clear(&mut self) {
        match self {
            ImageSlots::Single(slot) => *slot = None,
            ImageSlots::Multiple(images) => images.clear(),
        }
    }
}

/// A named image input on a workflow form.
#[derive(Debug, Clone)]
pub struct Slot {
    pub label: &'static str,
    pub images: ImageSlots,
    pub required: bool,
}

impl Slot {
    fn single(label: &'static str) -> Self {
        Self {
            label,
            images: ImageSlots::Single(None),
            required: true,
        }
    }

    fn multiple(label: &'static str) -> Self {
        Self {
            label,
            images: ImageSlots::Multiple(Vec::new()),
            required: true,
        }
    }
}

/// What a successful generation produced.
#[derive(Debug, Clone)]
pub enum GenerationOutput {
    Image(ImageFile),
    Video(String),
}

/// A held result plus its save-once flag. Dies with the next generation, so
/// a stale `saved` cannot outlive the result it belongs to.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub output: GenerationOutput,
    pub saved: bool,
}

/// Current phase of a workflow instance.
#[derive(Debug, Clone, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Requesting {
        message: String,
    },
    Succeeded(GenerationResult),
    Failed(String),
}

/// Complete state for one workflow tab.
#[derive(Debug)]
pub struct WorkflowState {
    pub kind: WorkflowKind,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub slots: Vec<Slot>,
    pub phase: WorkflowPhase,
    /// Which slot the next attached image lands in.
    pub active_slot: usize,
    /// Monotonic request counter; responses carrying an older value are
    /// stale and must be dropped.
    request_seq: u64,
}

impl WorkflowState {
    pub fn new(kind: WorkflowKind) -> Self {
        let slots = match kind {
            WorkflowKind::Generate => Vec::new(),
            WorkflowKind::Edit => vec![Slot::single("Source image")],
            WorkflowKind::StyleTransfer => {
                vec![Slot::single("Content image"), Slot::single("Style image")]
            }
            WorkflowKind::Outfit => {
                vec![Slot::single("Person image"), Slot::multiple("Clothing images")]
            }
            WorkflowKind::ProductScene => {
                vec![Slot::single("Person image"), Slot::single("Product image")]
            }
            WorkflowKind::Video => vec![Slot::single("Starting image")],
        };
        // Video defaults to a ratio the video service accepts.
        let aspect_ratio = match kind {
            WorkflowKind::Video => AspectRatio::Landscape,
            _ => AspectRatio::default(),
        };
        Self {
            kind,
            prompt: String::new(),
            aspect_ratio,
            slots,
            phase: WorkflowPhase::Idle,
            active_slot: 0,
            request_seq: 0,
        }
    }

    pub fn is_requesting(&self) -> bool {
        matches!(self.phase, WorkflowPhase::Requesting { .. })
    }

    /// The current request sequence number.
    pub fn seq(&self) -> u64 {
        self.request_seq
    }

    /// Check required inputs, naming the first missing field.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.kind.requires_prompt() && self.prompt.trim().is_empty() {
            return Err("Missing required field: Prompt".to_string());
        }
        for slot in &self.slots {
            if slot.required && slot.images.is_empty() {
                return Err(format!("Missing required field: {}", slot.label));
            }
        }
        Ok(())
    }

    /// Enter the Requesting phase, discarding any previous result, and hand
    /// back the sequence number the eventual response must carry.
    pub fn begin_request(&mut self, message: impl Into<String>) -> u64 {
        self.request_seq += 1;
        self.phase = WorkflowPhase::Requesting {
            message: message.into(),
        };
        self.request_seq
    }

    /// Record a validation failure without issuing a request.
    pub fn fail_validation(&mut self, message: String) {
        self.phase = WorkflowPhase::Failed(message);
    }

    /// Update the progress message of an in-flight request. Stale sequence
    /// numbers are ignored.
    pub fn apply_progress(&mut self, seq: u64, message: String) {
        if seq != self.request_seq {
            return;
        }
        if let WorkflowPhase::Requesting { message: current } = &mut self.phase {
            *current = message;
        }
    }

    /// Apply a completed request. Responses from a superseded request are
    /// dropped rather than applied to unrelated state.
    pub fn apply_result(&mut self, seq: u64, result: std::result::Result<GenerationOutput, String>) {
        if seq != self.request_seq || !self.is_requesting() {
            return;
        }
        self.phase = match result {
            Ok(output) => WorkflowPhase::Succeeded(GenerationResult {
                output,
                saved: false,
            }),
            Err(message) => WorkflowPhase::Failed(message),
        };
    }

    /// Apply a completed prompt enhancement: success rewrites the prompt and
    /// returns the workflow to Idle.
    pub fn apply_enhanced(&mut self, seq: u64, result: std::result::Result<String, String>) {
        if seq != self.request_seq || !self.is_requesting() {
            return;
        }
        self.phase = match result {
            Ok(text) => {
                self.prompt = text;
                WorkflowPhase::Idle
            }
            Err(message) => WorkflowPhase::Failed(message),
        };
    }

    /// The held result image, if the last generation produced one.
    pub fn result_image(&self) -> Option<&ImageFile> {
        match &self.phase {
            WorkflowPhase::Succeeded(GenerationResult {
                output: GenerationOutput::Image(image),
                ..
            }) => Some(image),
            _ => None,
        }
    }

    /// Whether the save affordance is live: a held image result that has not
    /// been saved yet.
    pub fn can_save(&self) -> bool {
        matches!(
            &self.phase,
            WorkflowPhase::Succeeded(GenerationResult {
                output: GenerationOutput::Image(_),
                saved: false,
            })
        )
    }

    /// Flip saved false -> true exactly once, handing back what to store.
    /// A second call is a no-op returning None, which guards against
    /// duplicate gallery entries from repeated saves.
    pub fn mark_saved(&mut self) -> Option<(ImageFile, String)> {
        match &mut self.phase {
            WorkflowPhase::Succeeded(result) if !result.saved => {
                if let GenerationOutput::Image(image) = &result.output {
                    let payload = (image.clone(), self.prompt.clone());
                    result.saved = true;
                    Some(payload)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Attach an image to the active slot.
    pub fn attach_image(&mut self, image: ImageFile) {
        if let Some(slot) = self.slots.get_mut(self.active_slot) {
            slot.images.attach(image);
        }
    }

    /// Move focus to the next image slot.
    pub fn next_slot(&mut self) {
        if !self.slots.is_empty() {
            self.active_slot = (self.active_slot + 1) % self.slots.len();
        }
    }

    /// Clear the active slot.
    pub fn clear_active_slot(&mut self) {
        if let Some(slot) = self.slots.get_mut(self.active_slot) {
            slot.images.clear();
        }
    }

    /// Cycle the aspect ratio, restricted to video-capable ratios on the
    /// video workflow.
    pub fn cycle_aspect_ratio(&mut self) {
        let video_only = self.kind == WorkflowKind::Video;
        self.aspect_ratio = self.aspect_ratio.next(video_only);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> ImageFile {
        ImageFile::from_inline("QUJD".into(), "image/png".into(), name.into())
    }

    #[test]
    fn test_validation_names_missing_prompt() {
        let state = WorkflowState::new(WorkflowKind::Generate);
        let err = state.validate().unwrap_err();
        assert_eq!(err, "Missing required field: Prompt");
    }

    #[test]
    fn test_validation_names_missing_image_slot() {
        let mut state = WorkflowState::new(WorkflowKind::Edit);
        state.prompt = "make it rain".to_string();
        let err = state.validate().unwrap_err();
        assert_eq!(err, "Missing required field: Source image");
    }

    #[test]
    fn test_style_transfer_needs_no_prompt() {
        let mut state = WorkflowState::new(WorkflowKind::StyleTransfer);
        state.slots[0].images.attach(image("content.png"));
        assert_eq!(
            state.validate().unwrap_err(),
            "Missing required field: Style image"
        );
        state.slots[1].images.attach(image("style.png"));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_outfit_requires_clothing_list() {
        let mut state = WorkflowState::new(WorkflowKind::Outfit);
        state.prompt = "casual".to_string();
        state.slots[0].images.attach(image("person.png"));
        assert_eq!(
            state.validate().unwrap_err(),
            "Missing required field: Clothing images"
        );
        state.slots[1].images.attach(image("shirt.png"));
        state.slots[1].images.attach(image("hat.png"));
        assert!(state.validate().is_ok());
        assert_eq!(state.slots[1].images.count(), 2);
    }

    #[test]
    fn test_request_lifecycle() {
        let mut state = WorkflowState::new(WorkflowKind::Generate);
        state.prompt = "a red bicycle".to_string();

        let seq = state.begin_request("Generating");
        assert!(state.is_requesting());

        state.apply_progress(seq, "Still generating".to_string());
        match &state.phase {
            WorkflowPhase::Requesting { message } => assert_eq!(message, "Still generating"),
            other => panic!("unexpected phase: {:?}", other),
        }

        state.apply_result(seq, Ok(GenerationOutput::Image(image("out.png"))));
        assert!(state.can_save());
    }

    #[test]
    fn test_failure_surfaces_message_and_clears_result() {
        let mut state = WorkflowState::new(WorkflowKind::Generate);
        state.prompt = "a red bicycle".to_string();

        let seq = state.begin_request("Generating");
        state.apply_result(seq, Ok(GenerationOutput::Image(image("out.png"))));
        assert!(state.result_image().is_some());

        let seq = state.begin_request("Generating");
        assert!(state.result_image().is_none());
        state.apply_result(seq, Err("quota exceeded".to_string()));
        match &state.phase {
            WorkflowPhase::Failed(message) => assert_eq!(message, "quota exceeded"),
            other => panic!("unexpected phase: {:?}", other),
        }
        assert!(!state.is_requesting());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut state = WorkflowState::new(WorkflowKind::Generate);
        state.prompt = "first".to_string();

        let stale_seq = state.begin_request("Generating");
        let fresh_seq = state.begin_request("Generating");

        state.apply_result(stale_seq, Ok(GenerationOutput::Image(image("stale.png"))));
        assert!(state.is_requesting());

        state.apply_result(fresh_seq, Ok(GenerationOutput::Image(image("fresh.png"))));
        assert_eq!(state.result_image().unwrap().name, "fresh.png");
    }

    #[test]
    fn test_save_is_once_only() {
        let mut state = WorkflowState::new(WorkflowKind::Generate);
        state.prompt = "a red bicycle".to_string();
        let seq = state.begin_request("Generating");
        state.apply_result(seq, Ok(GenerationOutput::Image(image("out.png"))));

        let first = state.mark_saved();
        assert!(first.is_some());
        assert_eq!(first.unwrap().1, "a red bicycle");
        // Result stays displayed but cannot be saved twice.
        assert!(state.result_image().is_some());
        assert!(!state.can_save());
        assert!(state.mark_saved().is_none());
    }

    #[test]
    fn test_video_result_is_not_saveable() {
        let mut state = WorkflowState::new(WorkflowKind::Video);
        state.prompt = "animate".to_string();
        let seq = state.begin_request("Rendering");
        state.apply_result(
            seq,
            Ok(GenerationOutput::Video("https://example.com/v.mp4".into())),
        );
        assert!(!state.can_save());
        assert!(state.mark_saved().is_none());
    }

    #[test]
    fn test_enhance_rewrites_prompt_and_returns_to_idle() {
        let mut state = WorkflowState::new(WorkflowKind::Generate);
        state.prompt = "cat".to_string();

        let seq = state.begin_request("Enhancing prompt");
        state.apply_enhanced(seq, Ok("a fluffy tabby cat at golden hour".to_string()));
        assert_eq!(state.prompt, "a fluffy tabby cat at golden hour");
        assert!(matches!(state.phase, WorkflowPhase::Idle));
    }

    #[test]
    fn test_video_aspect_cycle_stays_supported() {
        let mut state = WorkflowState::new(WorkflowKind::Video);
        assert!(state.aspect_ratio.supports_video());
        for _ in 0..5 {
            state.cycle_aspect_ratio();
            assert!(state.aspect_ratio.supports_video());
        }
    }
}
