use {super::super::location::Location, std::fmt};

/// A token along with its location and raw source text.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lexeme<'a>
{
    pub location: Location,

    /// The exact source text this lexeme was read from, e.g. `"+="` for
    /// [`Token::PlusEqual`] or `"\"foo\""` (quotes included) for a string
    /// literal whose content is `foo`. Used to reconstruct verbatim spans
    /// of source text for bare-token call arguments.
    pub text: &'a str,

    pub token: Token<'a>,
}

/// The reserved keywords of the recipe language.
///
/// Recognized by the lexer but, aside from call-chain and call-argument
/// syntax, carry no runtime semantics in this core (spec.md Non-goals).
pub const KEYWORDS: &[(&str, Token<'static>)] = &[
    ("if",       Token::If),
    ("else",     Token::Else),
    ("for",      Token::For),
    ("while",    Token::While),
    ("break",    Token::Break),
    ("continue", Token::Continue),
    ("return",   Token::Return),
    ("switch",   Token::Switch),
    ("case",     Token::Case),
    ("default",  Token::Default),
    ("true",     Token::True),
    ("false",    Token::False),
];

/// Structured information about a lexeme.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Token<'a>
{
    /// End of input. Yielded repeatedly once the source is exhausted.
    End,

    /// A single byte that could not be classified as any other token.
    Invalid(char),

    Identifier(&'a str),
    StringLiteral(&'a str),
    IntLiteral(i32),
    FloatLiteral(f32),

    /** `(` */ LeftParen,
    /** `)` */ RightParen,
    /** `{` */ LeftBrace,
    /** `}` */ RightBrace,
    /** `[` */ LeftBracket,
    /** `]` */ RightBracket,

    /** `,` */ Comma,
    /** `.` */ Dot,
    /** `;` */ Semicolon,
    /** `:` */ Colon,
    /** `@` */ At,
    /** `$` */ Dollar,

    /** `+` */ Plus,
    /** `-` */ Minus,
    /** `*` */ Star,
    /** `/` */ Slash,
    /** `%` */ Percent,

    /** `!`  */ Bang,
    /** `=`  */ Equal,
    /** `==` */ EqualEqual,
    /** `!=` */ BangEqual,
    /** `<`  */ Less,
    /** `<=` */ LessEqual,
    /** `>`  */ Greater,
    /** `>=` */ GreaterEqual,
    /** `<<` */ LessLess,
    /** `>>` */ GreaterGreater,
    /** `&&` */ AmpAmp,
    /** `||` */ PipePipe,
    /** `&`  */ Amp,
    /** `|`  */ Pipe,
    /** `^`  */ Caret,

    /** `+=` */ PlusEqual,
    /** `-=` */ MinusEqual,
    /** `*=` */ StarEqual,
    /** `/=` */ SlashEqual,
    /** `%=` */ PercentEqual,
    /** `&=` */ AmpEqual,
    /** `|=` */ PipeEqual,
    /** `^=` */ CaretEqual,

    /** `++` */ PlusPlus,
    /** `--` */ MinusMinus,

    If, Else, For, While, Break, Continue, Return, Switch, Case, Default,
    True, False,
}

impl<'a> fmt::Display for Token<'a>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self {
            Self::End              => write!(f, "end of input"),
            Self::Invalid(c)       => write!(f, "invalid byte {c:?}"),
            Self::Identifier(name) => write!(f, "identifier `{name}`"),
            Self::StringLiteral(s) => write!(f, "string literal {s:?}"),
            Self::IntLiteral(n)    => write!(f, "integer literal `{n}`"),
            Self::FloatLiteral(n)  => write!(f, "float literal `{n}`"),
            Self::LeftParen        => write!(f, "`(`"),
            Self::RightParen       => write!(f, "`)`"),
            Self::LeftBrace        => write!(f, "`{{`"),
            Self::RightBrace       => write!(f, "`}}`"),
            Self::LeftBracket      => write!(f, "`[`"),
            Self::RightBracket     => write!(f, "`]`"),
            Self::Comma            => write!(f, "`,`"),
            Self::Dot              => write!(f, "`.`"),
            Self::Semicolon        => write!(f, "`;`"),
            Self::Colon            => write!(f, "`:`"),
            Self::At               => write!(f, "`@`"),
            Self::Dollar           => write!(f, "`$`"),
            Self::Plus             => write!(f, "`+`"),
            Self::Minus            => write!(f, "`-`"),
            Self::Star             => write!(f, "`*`"),
            Self::Slash            => write!(f, "`/`"),
            Self::Percent          => write!(f, "`%`"),
            Self::Bang             => write!(f, "`!`"),
            Self::Equal            => write!(f, "`=`"),
            Self::EqualEqual       => write!(f, "`==`"),
            Self::BangEqual        => write!(f, "`!=`"),
            Self::Less             => write!(f, "`<`"),
            Self::LessEqual        => write!(f, "`<=`"),
            Self::Greater          => write!(f, "`>`"),
            Self::GreaterEqual     => write!(f, "`>=`"),
            Self::LessLess         => write!(f, "`<<`"),
            Self::GreaterGreater   => write!(f, "`>>`"),
            Self::AmpAmp           => write!(f, "`&&`"),
            Self::PipePipe         => write!(f, "`||`"),
            Self::Amp              => write!(f, "`&`"),
            Self::Pipe             => write!(f, "`|`"),
            Self::Caret            => write!(f, "`^`"),
            Self::PlusEqual        => write!(f, "`+=`"),
            Self::MinusEqual       => write!(f, "`-=`"),
            Self::StarEqual        => write!(f, "`*=`"),
            Self::SlashEqual       => write!(f, "`/=`"),
            Self::PercentEqual     => write!(f, "`%=`"),
            Self::AmpEqual         => write!(f, "`&=`"),
            Self::PipeEqual        => write!(f, "`|=`"),
            Self::CaretEqual       => write!(f, "`^=`"),
            Self::PlusPlus         => write!(f, "`++`"),
            Self::MinusMinus       => write!(f, "`--`"),
            Self::If               => write!(f, "`if`"),
            Self::Else             => write!(f, "`else`"),
            Self::For              => write!(f, "`for`"),
            Self::While            => write!(f, "`while`"),
            Self::Break            => write!(f, "`break`"),
            Self::Continue         => write!(f, "`continue`"),
            Self::Return           => write!(f, "`return`"),
            Self::Switch           => write!(f, "`switch`"),
            Self::Case             => write!(f, "`case`"),
            Self::Default          => write!(f, "`default`"),
            Self::True             => write!(f, "`true`"),
            Self::False            => write!(f, "`false`"),
        }
    }
}
