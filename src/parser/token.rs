//! Token kinds and the token record
//!
//! [`TokenKind`] is a closed enumeration generated from three tables:
//! special kinds recognized by pattern, fixed-text operators and punctuation,
//! and the reserved words of IEEE 1800-2017 plus the time-unit suffixes.
//! The operator table is kept longest-form-first; the lexer tries it in
//! order.

use super::ast::SourceLocation;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use std::fmt;

macro_rules! token_kinds {
    (
        special { $($sname:ident => $sdesc:literal,)* }
        operators { $($oname:ident => $otext:literal,)* }
        keywords { $($kname:ident => $ktext:literal,)* }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TokenKind {
            $($sname,)*
            $($oname,)*
            $($kname,)*
        }

        /// Operators and punctuation, longest form first
        pub const OPERATORS: &[(&str, TokenKind)] = &[
            $(($otext, TokenKind::$oname),)*
        ];

        /// Reserved words
        pub const KEYWORDS: &[(&str, TokenKind)] = &[
            $(($ktext, TokenKind::$kname),)*
        ];

        impl TokenKind {
            /// Exact source text for operator and keyword kinds
            pub fn fixed_text(self) -> Option<&'static str> {
                match self {
                    $(TokenKind::$sname => None,)*
                    $(TokenKind::$oname => Some($otext),)*
                    $(TokenKind::$kname => Some($ktext),)*
                }
            }

            pub fn is_keyword(self) -> bool {
                matches!(self, $(TokenKind::$kname)|*)
            }

            pub fn is_operator(self) -> bool {
                matches!(self, $(TokenKind::$oname)|*)
            }

            fn special_description(self) -> Option<&'static str> {
                match self {
                    $(TokenKind::$sname => Some($sdesc),)*
                    _ => None,
                }
            }
        }
    };
}

token_kinds! {
    special {
        Identifier => "identifier",
        Literal => "literal",
        StringLiteral => "string literal",
        LineComment => "line comment",
        BlockComment => "block comment",
        Directive => "directive",
        Eof => "end of input",
    }
    operators {
        ArithLeftShiftAssignment => "<<<=",
        ArithRightShiftAssignment => ">>>=",

        ArithLeftShift => "<<<",
        ArithRightShift => ">>>",
        CaseEqual => "===",
        CaseInequal => "!==",
        WildcardEqual => "==?",
        WildcardInequal => "!=?",
        LogicLeftShiftAssignment => "<<=",
        LogicRightShiftAssignment => ">>=",
        Equivalence => "<->",

        DoubleBackQuote => "``",
        Pow => "**",
        Equal => "==",
        Inequal => "!=",
        LessEqual => "<=",
        GreaterEqual => ">=",
        LogicAnd => "&&",
        LogicOr => "||",
        LogicLeftShift => "<<",
        LogicRightShift => ">>",
        AddAssignment => "+=",
        SubAssignment => "-=",
        MulAssignment => "*=",
        DivAssignment => "/=",
        ModAssignment => "%=",
        BitAndAssignment => "&=",
        BitOrAssignment => "|=",
        BitXorAssignment => "^=",
        Implication => "->",
        SelfIncrement => "++",
        SelfDecrement => "--",
        ScopeResolution => "::",
        PlusColon => "+:",
        MinusColon => "-:",
        BitNand => "~&",
        BitNor => "~|",
        BitXnor => "~^",
        BitXnorAlt => "^~",

        BackQuote => "`",
        Sharp => "#",
        LParen => "(",
        RParen => ")",
        LBrace => "{",
        RBrace => "}",
        LBracket => "[",
        RBracket => "]",
        Comma => ",",
        Colon => ":",
        Semicolon => ";",
        At => "@",
        Dot => ".",
        SingleQuote => "'",
        Dollar => "$",
        QuestionMark => "?",
        Assignment => "=",
        Add => "+",
        Sub => "-",
        Mul => "*",
        Div => "/",
        Mod => "%",
        BitAnd => "&",
        BitOr => "|",
        BitXor => "^",
        BitNot => "~",
        LogicNot => "!",
        LessThan => "<",
        GreaterThan => ">",
    }
    keywords {
        AcceptOn => "accept_on",
        Alias => "alias",
        Always => "always",
        AlwaysComb => "always_comb",
        AlwaysFf => "always_ff",
        AlwaysLatch => "always_latch",
        And => "and",
        Assert => "assert",
        Assign => "assign",
        Assume => "assume",
        Automatic => "automatic",
        Before => "before",
        Begin => "begin",
        Bind => "bind",
        Bins => "bins",
        Binsof => "binsof",
        Bit => "bit",
        Break => "break",
        Buf => "buf",
        Bufif0 => "bufif0",
        Bufif1 => "bufif1",
        Byte => "byte",
        Case => "case",
        Casex => "casex",
        Casez => "casez",
        Cell => "cell",
        Chandle => "chandle",
        Checker => "checker",
        Class => "class",
        Clocking => "clocking",
        Cmos => "cmos",
        Config => "config",
        Const => "const",
        Constraint => "constraint",
        Context => "context",
        Continue => "continue",
        Cover => "cover",
        Covergroup => "covergroup",
        Coverpoint => "coverpoint",
        Cross => "cross",
        Deassign => "deassign",
        Default => "default",
        Defparam => "defparam",
        Design => "design",
        Disable => "disable",
        Dist => "dist",
        Do => "do",
        Edge => "edge",
        Else => "else",
        End => "end",
        EndCase => "endcase",
        EndChecker => "endchecker",
        EndClass => "endclass",
        EndClocking => "endclocking",
        EndConfig => "endconfig",
        EndFunction => "endfunction",
        EndGenerate => "endgenerate",
        EndGroup => "endgroup",
        EndInterface => "endinterface",
        EndModule => "endmodule",
        EndPackage => "endpackage",
        EndPrimitive => "endprimitive",
        EndProgram => "endprogram",
        EndProperty => "endproperty",
        EndSpecify => "endspecify",
        EndSequence => "endsequence",
        EndTable => "endtable",
        EndTask => "endtask",
        Enum => "enum",
        Event => "event",
        Eventually => "eventually",
        Expect => "expect",
        Export => "export",
        Extends => "extends",
        Extern => "extern",
        Final => "final",
        FirstMatch => "first_match",
        For => "for",
        Force => "force",
        Foreach => "foreach",
        Forever => "forever",
        Fork => "fork",
        Forkjoin => "forkjoin",
        Function => "function",
        Generate => "generate",
        Genvar => "genvar",
        Global => "global",
        Highz0 => "highz0",
        Highz1 => "highz1",
        If => "if",
        Iff => "iff",
        Ifnone => "ifnone",
        IgnoreBins => "ignore_bins",
        IllegalBins => "illegal_bins",
        Implements => "implements",
        Implies => "implies",
        Import => "import",
        Incdir => "incdir",
        Include => "include",
        Initial => "initial",
        Inout => "inout",
        Input => "input",
        Inside => "inside",
        Instance => "instance",
        Int => "int",
        Integer => "integer",
        Interconnect => "interconnect",
        Interface => "interface",
        Intersect => "intersect",
        Join => "join",
        JoinAny => "join_any",
        JoinNone => "join_none",
        Large => "large",
        Let => "let",
        Liblist => "liblist",
        Library => "library",
        Local => "local",
        Localparam => "localparam",
        Logic => "logic",
        Longint => "longint",
        Macromodule => "macromodule",
        Matches => "matches",
        Medium => "medium",
        Modport => "modport",
        Module => "module",
        Nand => "nand",
        Negedge => "negedge",
        Nettype => "nettype",
        New => "new",
        Nexttime => "nexttime",
        Nmos => "nmos",
        Nor => "nor",
        Noshowcancelled => "noshowcancelled",
        Not => "not",
        Notif0 => "notif0",
        Notif1 => "notif1",
        Null => "null",
        Or => "or",
        Output => "output",
        Package => "package",
        Packed => "packed",
        Parameter => "parameter",
        Pmos => "pmos",
        Posedge => "posedge",
        Primitive => "primitive",
        Priority => "priority",
        Program => "program",
        Property => "property",
        Protected => "protected",
        Pull0 => "pull0",
        Pull1 => "pull1",
        Pulldown => "pulldown",
        Pullup => "pullup",
        PulsestyleOndetect => "pulsestyle_ondetect",
        PulsestyleOnevent => "pulsestyle_onevent",
        Pure => "pure",
        Rand => "rand",
        Randc => "randc",
        Randcase => "randcase",
        Randsequence => "randsequence",
        Rcmos => "rcmos",
        Real => "real",
        Realtime => "realtime",
        Ref => "ref",
        Reg => "reg",
        RejectOn => "reject_on",
        Release => "release",
        Repeat => "repeat",
        Restrict => "restrict",
        Return => "return",
        Rnmos => "rnmos",
        Rpmos => "rpmos",
        Rtran => "rtran",
        Rtranif0 => "rtranif0",
        Rtranif1 => "rtranif1",
        SAlways => "s_always",
        SEventually => "s_eventually",
        SNexttime => "s_nexttime",
        SUntil => "s_until",
        SUntilWith => "s_until_with",
        Scalared => "scalared",
        Sequence => "sequence",
        Shortint => "shortint",
        Shortreal => "shortreal",
        Showcancelled => "showcancelled",
        Signed => "signed",
        Small => "small",
        Soft => "soft",
        Solve => "solve",
        Specify => "specify",
        Specparam => "specparam",
        Static => "static",
        String => "string",
        Strong => "strong",
        Strong0 => "strong0",
        Strong1 => "strong1",
        Struct => "struct",
        Super => "super",
        Supply0 => "supply0",
        Supply1 => "supply1",
        SyncAcceptOn => "sync_accept_on",
        SyncRejectOn => "sync_reject_on",
        Table => "table",
        Tagged => "tagged",
        Task => "task",
        This => "this",
        Throughout => "throughout",
        Time => "time",
        Timeprecision => "timeprecision",
        Timeunit => "timeunit",
        Tran => "tran",
        Tranif0 => "tranif0",
        Tranif1 => "tranif1",
        Tri => "tri",
        Tri0 => "tri0",
        Tri1 => "tri1",
        Triand => "triand",
        Trior => "trior",
        Trireg => "trireg",
        Type => "type",
        Typedef => "typedef",
        Union => "union",
        Unique => "unique",
        Unique0 => "unique0",
        Unsigned => "unsigned",
        Until => "until",
        UntilWith => "until_with",
        Untyped => "untyped",
        Use => "use",
        Uwire => "uwire",
        Var => "var",
        Vectored => "vectored",
        Virtual => "virtual",
        Void => "void",
        Wait => "wait",
        WaitOrder => "wait_order",
        Wand => "wand",
        Weak => "weak",
        Weak0 => "weak0",
        Weak1 => "weak1",
        While => "while",
        Wildcard => "wildcard",
        Wire => "wire",
        With => "with",
        Within => "within",
        Wor => "wor",
        Xnor => "xnor",
        Xor => "xor",

        Second => "s",
        MilliSecond => "ms",
        MicroSecond => "us",
        NanoSecond => "ns",
        PicoSecond => "ps",
        FemtoSecond => "fs",
    }
}

static KEYWORD_TABLE: Lazy<FxHashMap<&'static str, TokenKind>> =
    Lazy::new(|| KEYWORDS.iter().copied().collect());

impl TokenKind {
    /// Look up a whole word in the reserved-word table.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        KEYWORD_TABLE.get(word).copied()
    }

    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }

    pub fn is_time_unit(self) -> bool {
        matches!(
            self,
            TokenKind::Second
                | TokenKind::MilliSecond
                | TokenKind::MicroSecond
                | TokenKind::NanoSecond
                | TokenKind::PicoSecond
                | TokenKind::FemtoSecond
        )
    }

    /// Identifier, or a word-shaped reserved word
    pub fn is_word(self) -> bool {
        self == TokenKind::Identifier || self.is_keyword()
    }

    pub fn is_direction(self) -> bool {
        matches!(self, TokenKind::Input | TokenKind::Output | TokenKind::Inout)
    }

    pub fn is_net_type(self) -> bool {
        matches!(
            self,
            TokenKind::Wire
                | TokenKind::Tri
                | TokenKind::Tri0
                | TokenKind::Tri1
                | TokenKind::Triand
                | TokenKind::Trior
                | TokenKind::Trireg
                | TokenKind::Wand
                | TokenKind::Wor
                | TokenKind::Uwire
                | TokenKind::Supply0
                | TokenKind::Supply1
                | TokenKind::Var
        )
    }

    pub fn is_integer_vector_type(self) -> bool {
        matches!(self, TokenKind::Logic | TokenKind::Bit | TokenKind::Reg)
    }

    pub fn is_integer_atom_type(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Integer
                | TokenKind::Byte
                | TokenKind::Shortint
                | TokenKind::Longint
                | TokenKind::Time
        )
    }

    pub fn is_non_integer_type(self) -> bool {
        matches!(
            self,
            TokenKind::Real | TokenKind::Shortreal | TokenKind::Realtime | TokenKind::String
        )
    }

    /// Tokens that can open a data type, implicit types included
    pub fn starts_data_type(self) -> bool {
        self.is_integer_vector_type()
            || self.is_integer_atom_type()
            || self.is_non_integer_type()
            || matches!(
                self,
                TokenKind::Signed | TokenKind::Unsigned | TokenKind::LBracket
            )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fixed_text() {
            Some(text) => write!(f, "'{}'", text),
            None => write!(f, "{}", self.special_description().unwrap_or("token")),
        }
    }
}

/// A lexed token; immutable once produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
    /// Location just past the last character
    pub end: SourceLocation,
    /// Byte offset into the source text
    pub offset: usize,
}

impl Token {
    pub fn end_offset(&self) -> usize {
        self.offset + self.text.len()
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Human-readable description used in error messages
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            TokenKind::Literal => format!("literal '{}'", self.text),
            TokenKind::StringLiteral => format!("string literal {}", self.text),
            TokenKind::Directive => format!("directive '{}'", self.text),
            TokenKind::LineComment | TokenKind::BlockComment | TokenKind::Eof => {
                self.kind.to_string()
            }
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}
