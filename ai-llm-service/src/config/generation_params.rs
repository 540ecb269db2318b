/// Per-call sampling knobs for a single generation request.
///
/// `None` means "use the profile default" from
/// [`LlmModelConfig`](crate::LlmModelConfig).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl GenerationParams {
    pub const fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        }
    }
}
