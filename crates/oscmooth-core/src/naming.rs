//! Deterministic names for generated channels, nodes and clip assets.
//!
//! Everything the compiler generates is named from the parameter name, the
//! namespace root (the synthesis tag) and, for clip assets, the host context
//! identifier. Re-running a compilation therefore produces the same names
//! and can reuse what a previous run created.
//!
//! Channel layout under a root of `OSCm`:
//!
//! ```text
//! OSCm/Local/<param>       local smoothing coefficient
//! OSCm/Remote/<param>      remote smoothing coefficient
//! OSCm/Proxy/<param>       smoothed output (previous frame feedback)
//! OSCm/Binary/<param><2^i> bit i of a quantized parameter
//! OSCm/Binary/<param>Negative  sign bit
//! OSCm/BlendSet            constant 1.0 weight for direct sums
//! ```

use crate::obfuscate::deobfuscate;
use crate::param::Context;

/// Default namespace root and synthesis tag.
pub const DEFAULT_NAMESPACE: &str = "OSCm";

/// Host-provided channel that is 1.0 for the local observer.
pub const IS_LOCAL_CHANNEL: &str = "IsLocal";

/// Name of the state inside the generated layer.
pub const GENERATED_STATE_NAME: &str = "OSCmooth";

/// File extension of generated clip assets.
pub const CLIP_EXTENSION: &str = "anim";

const PROXY: &str = "Proxy";
const BINARY: &str = "Binary";
const BLEND_SET: &str = "BlendSet";
const NEGATIVE: &str = "Negative";

/// Name factory for one namespace root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Names {
    root: String,
}

impl Default for Names {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl Names {
    /// Creates a name factory under `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    /// Namespace root, also the tag that marks generated artifacts.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns true if `name` carries the synthesis tag.
    ///
    /// An empty root tags nothing.
    pub fn is_tagged(&self, name: &str) -> bool {
        !self.root.is_empty() && name.contains(self.root.as_str())
    }

    /// Returns true if a channel name is generated, plain or obfuscated.
    pub fn is_generated_channel(&self, name: &str) -> bool {
        self.is_tagged(name) || self.is_tagged(&deobfuscate(name))
    }

    /// Returns true if `name` is a bit or sign channel, plain or obfuscated.
    pub fn is_binary_channel(&self, name: &str) -> bool {
        let prefix = format!("{}/{BINARY}/", self.root);
        !self.root.is_empty() && (name.starts_with(&prefix) || deobfuscate(name).starts_with(&prefix))
    }

    fn channel(&self, segment: &str, rest: &str) -> String {
        format!("{}/{segment}/{rest}", self.root)
    }

    /// Smoothing coefficient channel of `param` in `context`.
    pub fn coefficient(&self, context: Context, param: &str) -> String {
        self.channel(context.segment(), param)
    }

    /// Smoothed proxy channel of `param`.
    pub fn proxy(&self, param: &str) -> String {
        self.channel(PROXY, param)
    }

    /// Bit channel carrying weight `2^bit` of `param`.
    pub fn binary_bit(&self, param: &str, bit: u8) -> String {
        self.channel(BINARY, &format!("{param}{}", 1u32 << bit))
    }

    /// Sign channel of `param`.
    pub fn binary_negative(&self, param: &str) -> String {
        self.channel(BINARY, &format!("{param}{NEGATIVE}"))
    }

    /// Constant-one utility channel used as direct-sum weight.
    pub fn blend_set(&self) -> String {
        format!("{}/{BLEND_SET}", self.root)
    }

    /// Prefixes that mark a rewritten reference, stripped on revert.
    pub fn extension_prefixes(&self) -> Vec<String> {
        [PROXY, Context::Local.segment(), Context::Remote.segment(), BINARY]
            .iter()
            .map(|segment| format!("{}/{segment}/", self.root))
            .collect()
    }

    // --- Nodes ---

    /// Name of the generated layer.
    pub fn layer(&self) -> String {
        format!("_{}_Gen", self.root)
    }

    /// Root direct sum of the generated layer.
    pub fn root_node(&self) -> String {
        format!("{}_Root", self.root)
    }

    /// Selector between the remote and local smoothing subgraphs.
    pub fn smoother_root(&self) -> String {
        format!("{}_Smoother_Root", self.root)
    }

    /// Direct sum holding every parameter's filter for `context`.
    pub fn context_root(&self, context: Context) -> String {
        format!("{}_{}", self.root, context.segment())
    }

    /// Coefficient selector of one filter.
    pub fn filter_root(&self, param: &str) -> String {
        format!("{}_{param} Root", self.root)
    }

    /// Raw-input branch of one filter.
    pub fn filter_input(&self, param: &str) -> String {
        format!("{}_{param} Input", self.root)
    }

    /// Feedback branch of one filter.
    pub fn filter_driver(&self, param: &str) -> String {
        format!("{}_{param} Driver", self.root)
    }

    /// Direct sum holding every parameter's decoder.
    pub fn binary_root(&self) -> String {
        format!("{}_Binary_Root", self.root)
    }

    /// Sign selector (or the positive sum when unsigned) of one decoder.
    pub fn decoder_root(&self, param: &str) -> String {
        format!("{}_Binary_{param}_Root", self.root)
    }

    /// Positive or negative bit sum of one decoder.
    pub fn decoder_sum(&self, param: &str, negative: bool) -> String {
        let sign = if negative { NEGATIVE } else { "Positive" };
        format!("{}_Binary_{param}_{sign}", self.root)
    }

    /// Bit selector of one decoder.
    pub fn decoder_bit(&self, param: &str, bit: u8, negative: bool) -> String {
        let sign = if negative { "-" } else { "+" };
        format!("{}_Binary_{param}_Decode_{sign}{}", self.root, 1u32 << bit)
    }
}

/// Removes hierarchy separators so a parameter name is usable in asset names.
pub fn strip_separators(name: &str) -> String {
    name.chars().filter(|&c| c != '/').collect()
}

/// Driver clip asset of a smoothing filter at input bound `bound` (±1).
///
/// `<param>-<sign><bound>-Smoother-<context>.anim`
pub fn smoother_clip_name(param: &str, bound: f32, context_id: &str) -> String {
    let sign = if bound < 0.0 { '-' } else { '+' };
    format!(
        "{}-{sign}{}-Smoother-{context_id}.{CLIP_EXTENSION}",
        strip_separators(param),
        bound.abs()
    )
}

/// Decode clip asset of one bit state.
///
/// `<param>+True|False+<bit>+<weight>+<context>.anim`
pub fn binary_clip_name(param: &str, set: bool, bit: u8, weight: f32, context_id: &str) -> String {
    let state = if set { "True" } else { "False" };
    format!(
        "{}+{state}+{bit}+{weight}+{context_id}.{CLIP_EXTENSION}",
        strip_separators(param)
    )
}

/// Returns true if `name` is a clip asset generated for `context_id`.
pub fn is_generated_clip(name: &str, context_id: &str) -> bool {
    if context_id.is_empty() {
        return false;
    }
    let smoother = format!("-Smoother-{context_id}.{CLIP_EXTENSION}");
    let binary = format!("+{context_id}.{CLIP_EXTENSION}");
    name.ends_with(&smoother)
        || (name.ends_with(&binary) && (name.contains("+True+") || name.contains("+False+")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_clip_detection() {
        assert!(is_generated_clip("Smile-+1-Smoother-abc.anim", "abc"));
        assert!(is_generated_clip(&binary_clip_name("Jump", false, 0, 0.0, "abc"), "abc"));
        assert!(!is_generated_clip("Smile-+1-Smoother-abc.anim", "xyz"));
        assert!(!is_generated_clip("wave.anim", "abc"));
        assert!(!is_generated_clip("anything.anim", ""));
    }

    #[test]
    fn channel_layout() {
        let names = Names::default();
        assert_eq!(names.coefficient(Context::Local, "Smile"), "OSCm/Local/Smile");
        assert_eq!(names.coefficient(Context::Remote, "Smile"), "OSCm/Remote/Smile");
        assert_eq!(names.proxy("Smile"), "OSCm/Proxy/Smile");
        assert_eq!(names.binary_bit("Jump", 0), "OSCm/Binary/Jump1");
        assert_eq!(names.binary_bit("Jump", 2), "OSCm/Binary/Jump4");
        assert_eq!(names.binary_negative("Jump"), "OSCm/Binary/JumpNegative");
        assert_eq!(names.blend_set(), "OSCm/BlendSet");
    }

    #[test]
    fn generated_node_names_carry_tag() {
        let names = Names::new("Gen");
        for name in [
            names.layer(),
            names.root_node(),
            names.smoother_root(),
            names.context_root(Context::Local),
            names.filter_root("a"),
            names.filter_input("a"),
            names.filter_driver("a"),
            names.binary_root(),
            names.decoder_root("a"),
            names.decoder_sum("a", true),
            names.decoder_bit("a", 1, false),
        ] {
            assert!(names.is_tagged(&name), "{name}");
        }
    }

    #[test]
    fn clip_names_are_deterministic() {
        assert_eq!(
            smoother_clip_name("Face/Smile", -1.0, "abc"),
            "FaceSmile--1-Smoother-abc.anim"
        );
        assert_eq!(
            smoother_clip_name("Face/Smile", 1.0, "abc"),
            "FaceSmile-+1-Smoother-abc.anim"
        );
        assert_eq!(
            binary_clip_name("Jump", true, 2, 0.5, "abc"),
            "Jump+True+2+0.5+abc.anim"
        );
    }

    #[test]
    fn extension_prefixes_cover_all_segments() {
        let prefixes = Names::default().extension_prefixes();
        assert_eq!(prefixes.len(), 4);
        assert!(prefixes.contains(&"OSCm/Proxy/".to_string()));
        assert!(prefixes.contains(&"OSCm/Binary/".to_string()));
    }

    #[test]
    fn empty_root_tags_nothing() {
        let names = Names::new("");
        assert!(!names.is_tagged("Smile"));
        assert!(!names.is_generated_channel("OSCm/Proxy/Smile"));
        assert!(!names.is_binary_channel("/Binary/Jump1"));
    }

    #[test]
    fn binary_channels_are_recognized_when_obfuscated() {
        let names = Names::default();
        assert!(names.is_binary_channel("OSCm/Binary/Jump1"));
        assert!(names.is_binary_channel(&crate::obfuscate::obfuscate("OSCm/Binary/JumpNegative")));
        assert!(!names.is_binary_channel("OSCm/Proxy/Jump"));
        assert!(names.is_generated_channel(&crate::obfuscate::obfuscate("OSCm/Binary/Jump1")));
    }
}
