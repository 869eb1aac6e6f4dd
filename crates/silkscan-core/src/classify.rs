//! File name to layer type mapping.
//!
//! Rules are evaluated in table order and the first match wins: extension
//! rules first, then name-token rules. A name that matches several tokens
//! resolves by position in the table, never by specificity.

use crate::LayerType;

enum Rule {
    /// The extension (after the last `.`) equals one of these.
    Extension(&'static [&'static str]),
    /// The name contains every one of these tokens.
    AllOf(&'static [&'static str]),
    /// The name contains at least one of these tokens.
    AnyOf(&'static [&'static str]),
}

impl Rule {
    fn matches(&self, name: &str, ext: &str) -> bool {
        match self {
            Rule::Extension(exts) => exts.contains(&ext),
            Rule::AllOf(tokens) => tokens.iter().all(|t| name.contains(t)),
            Rule::AnyOf(tokens) => tokens.iter().any(|t| name.contains(t)),
        }
    }
}

const RULES: &[(Rule, LayerType)] = &[
    (Rule::Extension(&["gtl"]), LayerType::TopCopper),
    (Rule::Extension(&["gbl"]), LayerType::BottomCopper),
    (Rule::Extension(&["gto"]), LayerType::TopSilkscreen),
    (Rule::Extension(&["gbo"]), LayerType::BottomSilkscreen),
    (Rule::Extension(&["gts"]), LayerType::TopSolderMask),
    (Rule::Extension(&["gbs"]), LayerType::BottomSolderMask),
    (Rule::Extension(&["gtp"]), LayerType::TopPaste),
    (Rule::Extension(&["gbp"]), LayerType::BottomPaste),
    (Rule::Extension(&["drl", "xln", "nc"]), LayerType::Drill),
    (Rule::Extension(&["gko"]), LayerType::Outline),
    (Rule::AllOf(&["top", "silk"]), LayerType::TopSilkscreen),
    (Rule::AllOf(&["bot", "silk"]), LayerType::BottomSilkscreen),
    (Rule::AllOf(&["top", "smask"]), LayerType::TopSolderMask),
    (Rule::AllOf(&["bot", "smask"]), LayerType::BottomSolderMask),
    (Rule::AllOf(&["top", "paste"]), LayerType::TopPaste),
    (Rule::AllOf(&["bottom", "paste"]), LayerType::BottomPaste),
    (Rule::AnyOf(&["top", "toplayer"]), LayerType::TopCopper),
    (Rule::AnyOf(&["bottom", "bottomlayer"]), LayerType::BottomCopper),
    (Rule::AnyOf(&["outline", "board_edge"]), LayerType::Outline),
    (Rule::AnyOf(&["drill"]), LayerType::Drill),
];

/// Extensions accepted as fabrication data when reading an upload.
const FABRICATION_EXTENSIONS: &[&str] = &[
    "gtl", "gbl", "gto", "gbo", "gts", "gbs", "txt", "dri", "drl", "xln", "ger", "gbr", "gbp",
    "gtp", "gko", "nc",
];

/// Extension after the last `.`, or `""` when the name has none.
pub(crate) fn extension_of(filename: &str) -> &str {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    match base.rfind('.') {
        Some(idx) => &base[idx + 1..],
        None => "",
    }
}

/// Classify a fabrication file by its name (case-insensitive).
///
/// Defined for every input; unknown names map to [`LayerType::Other`].
pub fn classify(filename: &str) -> LayerType {
    let name = filename.to_ascii_lowercase();
    let ext = extension_of(&name);
    RULES
        .iter()
        .find(|(rule, _)| rule.matches(&name, ext))
        .map(|(_, ty)| *ty)
        .unwrap_or(LayerType::Other)
}

/// Whether an upload entry looks like fabrication data worth plotting.
pub fn is_fabrication_file(filename: &str) -> bool {
    let name = filename.to_ascii_lowercase();
    FABRICATION_EXTENSIONS.contains(&extension_of(&name))
}
