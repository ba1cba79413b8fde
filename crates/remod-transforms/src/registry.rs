//! Transform identifiers and the user-selected transform set.

use crate::class::ClassTransform;
use crate::contract::{Transform, TransformError};
use crate::rules::{
    ArgSpread, Arrow, ArrowReturn, Exponent, LetDeclarations, MultiVar, NoStrict, ObjMethod,
    ObjShorthand,
};
use indexmap::IndexSet;
use std::fmt;
use std::str::FromStr;

/// Every transform the registry knows, by identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformId {
    Class,
    Let,
    Arrow,
    ArrowReturn,
    ObjMethod,
    ObjShorthand,
    NoStrict,
    Exponent,
    MultiVar,
    ArgSpread,
}

impl TransformId {
    pub const ALL: [TransformId; 10] = [
        TransformId::Class,
        TransformId::Let,
        TransformId::Arrow,
        TransformId::ArrowReturn,
        TransformId::ObjMethod,
        TransformId::ObjShorthand,
        TransformId::NoStrict,
        TransformId::Exponent,
        TransformId::MultiVar,
        TransformId::ArgSpread,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TransformId::Class => "class",
            TransformId::Let => "let",
            TransformId::Arrow => "arrow",
            TransformId::ArrowReturn => "arrow-return",
            TransformId::ObjMethod => "obj-method",
            TransformId::ObjShorthand => "obj-shorthand",
            TransformId::NoStrict => "no-strict",
            TransformId::Exponent => "exponent",
            TransformId::MultiVar => "multi-var",
            TransformId::ArgSpread => "arg-spread",
        }
    }

    pub fn instantiate(self) -> Box<dyn Transform> {
        match self {
            TransformId::Class => Box::new(ClassTransform::new()),
            TransformId::Let => Box::new(LetDeclarations::new()),
            TransformId::Arrow => Box::new(Arrow),
            TransformId::ArrowReturn => Box::new(ArrowReturn),
            TransformId::ObjMethod => Box::new(ObjMethod),
            TransformId::ObjShorthand => Box::new(ObjShorthand),
            TransformId::NoStrict => Box::new(NoStrict),
            TransformId::Exponent => Box::new(Exponent),
            TransformId::MultiVar => Box::new(MultiVar),
            TransformId::ArgSpread => Box::new(ArgSpread),
        }
    }
}

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformId {
    type Err = TransformError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        TransformId::ALL
            .into_iter()
            .find(|id| id.as_str() == name)
            .ok_or_else(|| TransformError::UnknownTransform(name.to_string()))
    }
}

/// Identifiers of every available transform.
pub fn available_transforms() -> Vec<&'static str> {
    TransformId::ALL.iter().map(|id| id.as_str()).collect()
}

/// Ordered, duplicate-free selection of transforms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformSet {
    ids: IndexSet<TransformId>,
}

impl TransformSet {
    /// Parse a comma-separated list such as `let,arrow`. Empty entries are
    /// ignored; the first unknown name fails the whole list.
    pub fn parse(list: &str) -> Result<Self, TransformError> {
        let mut ids = IndexSet::new();
        for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            ids.insert(name.parse::<TransformId>()?);
        }
        Ok(TransformSet { ids })
    }

    pub fn from_ids(ids: impl IntoIterator<Item = TransformId>) -> Self {
        TransformSet {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = TransformId> + '_ {
        self.ids.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Fresh transform instances, in selection order.
    pub fn instantiate(&self) -> Vec<Box<dyn Transform>> {
        self.ids.iter().map(|id| id.instantiate()).collect()
    }
}

impl FromStr for TransformSet {
    type Err = TransformError;

    fn from_str(list: &str) -> Result<Self, Self::Err> {
        TransformSet::parse(list)
    }
}
