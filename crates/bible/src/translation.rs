//! Supported translations.

/// Translation used until the reader picks another.
pub const DEFAULT_TRANSLATION: &str = "ARA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub id: &'static str,
    pub name: &'static str,
}

pub static TRANSLATIONS: [Translation; 5] = [
    Translation { id: "ARA", name: "Almeida Revista e Atualizada" },
    Translation { id: "ARC", name: "Almeida Revista e Corrigida" },
    Translation { id: "NVI", name: "Nova Versão Internacional" },
    Translation { id: "NVT", name: "Nova Versão Transformadora" },
    Translation { id: "KJA", name: "King James Atualizada" },
];

/// Look a translation up by id, ignoring case.
///
/// Unknown ids are not an error anywhere in this crate: the resolver passes
/// whatever it is given on to the model.
pub fn find_translation(id: &str) -> Option<&'static Translation> {
    TRANSLATIONS.iter().find(|t| t.id.eq_ignore_ascii_case(id.trim()))
}
