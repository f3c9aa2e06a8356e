use std::collections::HashMap;

/// How a planner id is rewritten into a local id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdTransform {
    /// Keep the id as is.
    #[default]
    Identity,
    /// Replace every `-` with `_`.
    Underscore,
    /// Pascal-snake-case, e.g. `iron-plate` becomes `Iron_Plate`.
    PascalSnake,
}

impl IdTransform {
    /// Apply the transform to `id`.
    pub fn apply(self, id: &str) -> String {
        match self {
            IdTransform::Identity => id.to_string(),
            IdTransform::Underscore => id.replace('-', "_"),
            IdTransform::PascalSnake => pascal_snake_case(id),
        }
    }
}

/// Per-mod migration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MigrationRule {
    /// Item id rewrite.
    pub transform: IdTransform,
    /// Generate fluid barrel items and fill/empty processes.
    pub barrels: bool,
    /// Generate container items and load/unload processes.
    pub containers: bool,
}

/// Table of migration rules keyed by planner mod id.
///
/// Mods without an entry migrate with [`MigrationRule::default`].
#[derive(Debug, Clone)]
pub struct MigrationRules {
    rules: HashMap<String, MigrationRule>,
}

impl Default for MigrationRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl MigrationRules {
    /// No special cases: every mod migrates with identity ids.
    pub fn empty() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Rules for the mods the local datasets are known to map to.
    pub fn builtin() -> Self {
        let barrels = MigrationRule {
            barrels: true,
            ..MigrationRule::default()
        };
        Self::empty()
            .with_rule(
                "sfy",
                MigrationRule {
                    transform: IdTransform::Underscore,
                    ..MigrationRule::default()
                },
            )
            .with_rule(
                "dsp",
                MigrationRule {
                    transform: IdTransform::PascalSnake,
                    ..MigrationRule::default()
                },
            )
            .with_rule("bobang", barrels)
            .with_rule("pysalf", barrels)
            .with_rule(
                "ffw",
                MigrationRule {
                    containers: true,
                    ..barrels
                },
            )
    }

    /// Add or replace the rule for `mod_id`.
    pub fn with_rule(mut self, mod_id: impl Into<String>, rule: MigrationRule) -> Self {
        self.rules.insert(mod_id.into(), rule);
        self
    }

    /// Rule for `mod_id`.
    pub fn rule(&self, mod_id: &str) -> MigrationRule {
        self.rules.get(mod_id).copied().unwrap_or_default()
    }
}

/// Split `input` into words and join them capitalised with `_`.
///
/// Words break at non-alphanumeric characters, at lower/digit to upper
/// transitions, and before the last capital of an acronym followed by a
/// lowercase letter (`HTTPServer` becomes `Http_Server`).
pub fn pascal_snake_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|word| capitalize(word))
        .collect::<Vec<_>>()
        .join("_")
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (index, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let boundary = match current.chars().last() {
            Some(prev) if ch.is_uppercase() => {
                prev.is_lowercase()
                    || prev.is_numeric()
                    || (prev.is_uppercase()
                        && chars
                            .get(index + 1)
                            .is_some_and(|next| next.is_lowercase()))
            }
            _ => false,
        };
        if boundary {
            words.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lower-case the first character of `input`.
pub(crate) fn lower_first(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
