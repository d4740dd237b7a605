//! Configuration.

/// Compiler configuration parameters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JackConf {
    /// Indent every instruction except `function` and `label` lines.
    pub indent: bool,
}
