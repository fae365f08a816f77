//! Brand token blocks prepended to every image prompt.
//!
//! Brand consistency is enforced per-call: each prompt sent to the image
//! model carries a mandatory "BRAND TOKENS" / "NEGATIVES" header built from
//! the brand row, rather than anything trained or cached upstream.

/// Inputs for the brand token block, loaded via the slide -> post -> project
/// -> brand chain.
#[derive(Debug, Clone, Default)]
pub struct BrandTokens {
    pub palette: Vec<String>,
    pub visual_tone: Option<String>,
    pub dont_rules: Option<String>,
}

impl BrandTokens {
    /// Render the mandatory header block.
    pub fn header(&self) -> String {
        let mut lines = Vec::new();

        let mut tokens = Vec::new();
        if !self.palette.is_empty() {
            tokens.push(format!("palette {}", self.palette.join(" ")));
        }
        if let Some(tone) = self.visual_tone.as_deref().filter(|t| !t.is_empty()) {
            tokens.push(format!("tone {tone}"));
        }
        lines.push(format!("BRAND TOKENS: {}", tokens.join("; ")));

        if let Some(dont) = self.dont_rules.as_deref().filter(|d| !d.is_empty()) {
            lines.push(format!("NEGATIVES: {dont}"));
        }

        lines.join("\n")
    }

    /// Prepend the header block to an image prompt.
    pub fn apply(&self, prompt: &str) -> String {
        format!("{}\n\n{prompt}", self.header())
    }
}
