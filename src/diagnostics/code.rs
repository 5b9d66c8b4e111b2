//! Stable diagnostic codes — contracts with the LSP (spec §4.5).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // E00x — resolution
    E001FileNotFound,
    E002CircularInclude,
    E003ExternalDocstringMissing,
    E004ReadError,
    E005ParseError,

    // E10x — naming
    E101InvalidTypeName,
    E102InvalidFieldName,
    E103InvalidConstName,
    E104InvalidEnumMemberName,

    // E20x — type references
    E201UndeclaredType,
    E202MissingSpreadTarget,
    E203SpreadFieldConflict,
    E204SpreadCycle,

    // E30x — enums
    E301MixedEnumValueKinds,
    E302MissingEnumValue,
    E303DuplicateEnumMember,

    // E40x — patterns
    E401InvalidPlaceholder,

    // E50x — RPC structure
    E501DuplicateProc,
    E502DuplicateStream,
    E503ProcStreamNameCollision,

    // E60x — type-dependency cycles
    E601TypeDependencyCycle,

    // E70x — input/output structure
    E701MultipleInputBlocks,
    E702MultipleOutputBlocks,
    E703DuplicateFieldName,

    // E80x — global duplicate declarations
    E801DuplicateType,
    E802DuplicateEnum,
    E803DuplicateConst,
    E804DuplicatePattern,
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            DiagnosticCode::E001FileNotFound => "E001",
            DiagnosticCode::E002CircularInclude => "E002",
            DiagnosticCode::E003ExternalDocstringMissing => "E003",
            DiagnosticCode::E004ReadError => "E004",
            DiagnosticCode::E005ParseError => "E005",
            DiagnosticCode::E101InvalidTypeName => "E101",
            DiagnosticCode::E102InvalidFieldName => "E102",
            DiagnosticCode::E103InvalidConstName => "E103",
            DiagnosticCode::E104InvalidEnumMemberName => "E104",
            DiagnosticCode::E201UndeclaredType => "E201",
            DiagnosticCode::E202MissingSpreadTarget => "E202",
            DiagnosticCode::E203SpreadFieldConflict => "E203",
            DiagnosticCode::E204SpreadCycle => "E204",
            DiagnosticCode::E301MixedEnumValueKinds => "E301",
            DiagnosticCode::E302MissingEnumValue => "E302",
            DiagnosticCode::E303DuplicateEnumMember => "E303",
            DiagnosticCode::E401InvalidPlaceholder => "E401",
            DiagnosticCode::E501DuplicateProc => "E501",
            DiagnosticCode::E502DuplicateStream => "E502",
            DiagnosticCode::E503ProcStreamNameCollision => "E503",
            DiagnosticCode::E601TypeDependencyCycle => "E601",
            DiagnosticCode::E701MultipleInputBlocks => "E701",
            DiagnosticCode::E702MultipleOutputBlocks => "E702",
            DiagnosticCode::E703DuplicateFieldName => "E703",
            DiagnosticCode::E801DuplicateType => "E801",
            DiagnosticCode::E802DuplicateEnum => "E802",
            DiagnosticCode::E803DuplicateConst => "E803",
            DiagnosticCode::E804DuplicatePattern => "E804",
        };
        write!(f, "{code}")
    }
}
