// size-class-codes/src/scheme.rs

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use log::debug;

use crate::{
    BitPositionTable, Code, Error, Rounded, Size, SizeCodec, VariablePrefix, DEFAULT_CODE_WIDTH,
};

/// The registered size-code schemes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemeKind {
    /// Code and size are the same number.
    Linear,
    /// Code bit `i` at output bit `2 * i`.
    Spacing1,
    /// Code bit `i` at output bit `3 * i`.
    Spacing2,
    /// Code bit `i` at output bit `4 * i`.
    Spacing3,
    /// Code bit `i` at output bit `5 * i`.
    Spacing4,
    /// Code bits at [`SPACING_EXP_POSITIONS`](crate::SPACING_EXP_POSITIONS).
    SpacingExp,
    /// See [`VariablePrefix`].
    VariablePrefix,
}

impl SchemeKind {
    pub const ALL: [SchemeKind; 7] = [
        SchemeKind::Linear,
        SchemeKind::Spacing1,
        SchemeKind::Spacing2,
        SchemeKind::Spacing3,
        SchemeKind::Spacing4,
        SchemeKind::SpacingExp,
        SchemeKind::VariablePrefix,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SchemeKind::Linear => "linear",
            SchemeKind::Spacing1 => "spacing-1",
            SchemeKind::Spacing2 => "spacing-2",
            SchemeKind::Spacing3 => "spacing-3",
            SchemeKind::Spacing4 => "spacing-4",
            SchemeKind::SpacingExp => "spacing-exp",
            SchemeKind::VariablePrefix => "variable-prefix",
        }
    }

    /// Distance between consecutive output bits, for the uniform tables.
    pub fn stride(self) -> Option<u32> {
        match self {
            SchemeKind::Linear => Some(1),
            SchemeKind::Spacing1 => Some(2),
            SchemeKind::Spacing2 => Some(3),
            SchemeKind::Spacing3 => Some(4),
            SchemeKind::Spacing4 => Some(5),
            SchemeKind::SpacingExp | SchemeKind::VariablePrefix => None,
        }
    }
}

impl Display for SchemeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.pad(self.name())
    }
}

impl FromStr for SchemeKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        SchemeKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| Error::UnknownScheme(name.to_owned()))
    }
}

/// One registered scheme at a chosen code width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheme {
    kind: SchemeKind,
    codec: Codec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Codec {
    Table(BitPositionTable),
    VariablePrefix(VariablePrefix),
}

impl Scheme {
    pub fn new(kind: SchemeKind, width: u32) -> Result<Self, Error> {
        let codec = match kind.stride() {
            Some(stride) => Codec::Table(BitPositionTable::uniform(stride, width)?),
            None if kind == SchemeKind::SpacingExp => {
                Codec::Table(BitPositionTable::spacing_exp(width)?)
            }
            None => Codec::VariablePrefix(VariablePrefix::new(width)?),
        };
        debug!("Scheme::new({}, width={})", kind, width);
        Ok(Self { kind, codec })
    }

    /// The scheme at [`DEFAULT_CODE_WIDTH`].
    pub fn from_kind(kind: SchemeKind) -> Self {
        // Every registered layout fits at the default width.
        Self::new(kind, DEFAULT_CODE_WIDTH).unwrap()
    }

    /// Every registered scheme at `width`, in [`SchemeKind::ALL`] order.
    pub fn registry(width: u32) -> Result<Vec<Self>, Error> {
        SchemeKind::ALL
            .into_iter()
            .map(|kind| Self::new(kind, width))
            .collect()
    }

    pub fn kind(&self) -> SchemeKind {
        self.kind
    }

    /// The bit-position table behind a table scheme.
    pub fn table(&self) -> Option<&BitPositionTable> {
        match &self.codec {
            Codec::Table(table) => Some(table),
            Codec::VariablePrefix(_) => None,
        }
    }

    fn codec(&self) -> &dyn SizeCodec {
        match &self.codec {
            Codec::Table(table) => table,
            Codec::VariablePrefix(variable_prefix) => variable_prefix,
        }
    }
}

impl SizeCodec for Scheme {
    fn code_width(&self) -> u32 {
        self.codec().code_width()
    }

    fn decode(&self, code: Code) -> Size {
        self.codec().decode(code)
    }

    fn round_up(&self, request: Size) -> Rounded {
        self.codec().round_up(request)
    }

    fn round_down(&self, size: Size) -> Rounded {
        self.codec().round_down(size)
    }

    fn max_representable_size(&self) -> Size {
        self.codec().max_representable_size()
    }
}

impl FromStr for Scheme {
    type Err = Error;

    /// Parses a scheme name at the default width.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_kind(name.parse()?))
    }
}
