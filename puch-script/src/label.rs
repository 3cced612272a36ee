//! Script label type.

use std::fmt;

use serde::{Serialize, Serializer};
use unicode_script::Script;

/// A Unicode script, rendered as its upper-case name (`LATIN`, `TAMIL`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScriptLabel(Script);

impl ScriptLabel {
    /// The fallback label.
    pub const LATIN: Self = Self(Script::Latin);

    /// The underlying Unicode script.
    pub fn script(self) -> Script {
        self.0
    }

    /// Upper-case script name.
    pub fn name(self) -> String {
        self.0.full_name().to_uppercase()
    }
}

impl Default for ScriptLabel {
    fn default() -> Self {
        Self::LATIN
    }
}

impl From<Script> for ScriptLabel {
    fn from(script: Script) -> Self {
        Self(script)
    }
}

impl fmt::Display for ScriptLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl Serialize for ScriptLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name())
    }
}
