//! Script tallying.

use unicode_script::{Script, UnicodeScript};

use crate::label::ScriptLabel;

/// Scripts shared across writing systems; they say nothing about the text.
fn is_neutral(script: Script) -> bool {
    matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

/// Returns the script most alphabetic characters of `text` belong to.
///
/// Characters in the Common, Inherited or Unknown scripts are ignored. Ties
/// go to the script seen first. Absent, empty or letter-free text is
/// [`ScriptLabel::LATIN`].
pub fn dominant_script(text: Option<&str>) -> ScriptLabel {
    let Some(text) = text else {
        return ScriptLabel::LATIN;
    };

    // Discovery order is kept so the first script wins ties.
    let mut tally: Vec<(Script, usize)> = Vec::new();
    for ch in text.chars().filter(|c| c.is_alphabetic()) {
        let script = ch.script();
        if is_neutral(script) {
            continue;
        }
        match tally.iter_mut().find(|(s, _)| *s == script) {
            Some((_, count)) => *count += 1,
            None => tally.push((script, 1)),
        }
    }

    let mut best: Option<(Script, usize)> = None;
    for (script, count) in tally {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((script, count));
        }
    }

    best.map_or(ScriptLabel::LATIN, |(script, _)| script.into())
}

/// Builds a predicate that is true when any alphabetic character of its
/// argument belongs to `label`'s script.
pub fn script_matcher(label: ScriptLabel) -> impl Fn(&str) -> bool + Copy + Send + Sync {
    let target = label.script();
    move |text: &str| text.chars().any(|c| c.is_alphabetic() && c.script() == target)
}
