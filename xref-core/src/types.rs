//! Domain entities tracked by the cross-reference graph.
//!
//! Every entity carries its identity as a [`CodeLabel`] field and one link
//! table pointing at the entities it is related to. Link tables only hold
//! typed positions; the entities themselves live in the environment's
//! registries.

use serde::Serialize;

use crate::index::CodeIndex;
use crate::registry::Handle;

/// A `(code, label)` pair identifying a domain entity.
///
/// The code is the stable identity. The label is descriptive and is taken
/// from the first row that mentions the code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct CodeLabel {
    pub code: String,
    pub label: String,
}

impl CodeLabel {
    pub fn new(code: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
        }
    }
}

/// Entities that can be stored in a [`Registry`](crate::registry::Registry).
pub trait Entity {
    /// Short kind name used in logs.
    const KIND: &'static str;

    /// Typed position of this kind of entity in its registry.
    type Handle: Handle;

    /// Build a fresh entity with empty link tables.
    fn from_ident(ident: CodeLabel) -> Self;

    fn ident(&self) -> &CodeLabel;

    fn code(&self) -> &str {
        &self.ident().code
    }

    fn label(&self) -> &str {
        &self.ident().label
    }
}

/// A functional area that failures are reported against.
#[derive(Clone, Debug)]
pub struct Function {
    pub(crate) ident: CodeLabel,
    pub(crate) failures: CodeIndex<FailureId>,
}

/// A failure mode.
#[derive(Clone, Debug)]
pub struct Failure {
    pub(crate) ident: CodeLabel,
    pub(crate) functions: CodeIndex<FunctionId>,
}

/// A part or component.
#[derive(Clone, Debug)]
pub struct Article {
    pub(crate) ident: CodeLabel,
    pub(crate) causes: CodeIndex<CauseId>,
}

/// A root cause attributed to one or more articles.
#[derive(Clone, Debug)]
pub struct Cause {
    pub(crate) ident: CodeLabel,
    pub(crate) articles: CodeIndex<ArticleId>,
}

macro_rules! impl_entity {
    ($ty:ident, $id:ident, $kind:literal, $table:ident: $linked:ty, $doc:literal) => {
        #[doc = concat!("Position of a [`", stringify!($ty), "`] in its registry.")]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $id(usize);

        impl Handle for $id {
            fn from_index(index: usize) -> Self {
                Self(index)
            }

            fn index(self) -> usize {
                self.0
            }
        }

        impl Entity for $ty {
            const KIND: &'static str = $kind;
            type Handle = $id;

            fn from_ident(ident: CodeLabel) -> Self {
                Self {
                    ident,
                    $table: CodeIndex::new(),
                }
            }

            fn ident(&self) -> &CodeLabel {
                &self.ident
            }
        }

        impl $ty {
            #[doc = $doc]
            pub fn $table(&self) -> &CodeIndex<$linked> {
                &self.$table
            }
        }
    };
}

impl_entity!(Function, FunctionId, "function", failures: FailureId, "Failures observed together with this function.");
impl_entity!(Failure, FailureId, "failure", functions: FunctionId, "Functions this failure was observed on.");
impl_entity!(Article, ArticleId, "article", causes: CauseId, "Causes attributed to this article.");
impl_entity!(Cause, CauseId, "cause", articles: ArticleId, "Articles this cause was attributed to.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ident_starts_unlinked() {
        let function = Function::from_ident(CodeLabel::new("FN1", "Braking"));
        assert_eq!(function.code(), "FN1");
        assert_eq!(function.label(), "Braking");
        assert!(function.failures().is_empty());

        let cause = Cause::from_ident(CodeLabel::new("C1", "Wear"));
        assert!(cause.articles().is_empty());
    }

    #[test]
    fn test_code_label_serializes_both_fields() {
        let json = serde_json::to_string(&CodeLabel::new("ART1", "Valve")).unwrap();
        assert_eq!(json, r#"{"code":"ART1","label":"Valve"}"#);
    }
}
