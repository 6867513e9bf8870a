//! Expression parser for bonus formulas
//!
//! Grammar (precedence climbing, left associative):
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | primary
//! primary := number | '@' path | ident '(' args ')' | '(' expr ')'
//! ```
//!
//! Dice terms such as `1d6` are rejected: bonus formulas must be deterministic.

use super::{FormulaError, RollData};

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Reference(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
}

/// Parsed formula expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Reference(String),
    Neg(Box<Expr>),
    Add(Box<Expr>, Box<Expr>),
    Sub(Box<Expr>, Box<Expr>),
    Mul(Box<Expr>, Box<Expr>),
    Div(Box<Expr>, Box<Expr>),
    Call(Function, Vec<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Floor,
    Ceil,
    Round,
    Abs,
    Min,
    Max,
}

impl Function {
    fn from_name(name: &str) -> Option<Function> {
        match name {
            "floor" => Some(Function::Floor),
            "ceil" => Some(Function::Ceil),
            "round" => Some(Function::Round),
            "abs" => Some(Function::Abs),
            "min" => Some(Function::Min),
            "max" => Some(Function::Max),
            _ => None,
        }
    }
}

fn is_dice_term(word: &str) -> bool {
    let mut chars = word.chars();
    chars.next() == Some('d') && word.len() > 1 && chars.all(|c| c.is_ascii_digit())
}

fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\n' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '@' => {
                let start = i + 1;
                i = start;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_')
                {
                    i += 1;
                }
                if i == start {
                    return Err(FormulaError::Syntax("empty reference after '@'".to_string()));
                }
                let path: String = chars[start..i].iter().collect();
                tokens.push(Token::Reference(path.trim_end_matches('.').to_string()));
            }
            c if c.is_ascii_digit() || c == '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                // "2d6" lexes as a number glued to a dice word
                if i < chars.len() && chars[i] == 'd' {
                    return Err(FormulaError::DiceTerm(input.trim().to_string()));
                }
                let value = text
                    .parse::<f64>()
                    .map_err(|_| FormulaError::Syntax(format!("invalid number '{}'", text)))?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                if is_dice_term(&word) {
                    return Err(FormulaError::DiceTerm(input.trim().to_string()));
                }
                tokens.push(Token::Ident(word.to_lowercase()));
            }
            other => {
                return Err(FormulaError::Syntax(format!("unexpected character '{}'", other)));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaError> {
        match self.next() {
            Some(ref t) if *t == expected => Ok(()),
            Some(t) => Err(FormulaError::Syntax(format!(
                "expected {:?}, found {:?}",
                expected, t
            ))),
            None => Err(FormulaError::Syntax(format!(
                "expected {:?}, found end of input",
                expected
            ))),
        }
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    lhs = Expr::Add(Box::new(lhs), Box::new(self.term()?));
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    lhs = Expr::Sub(Box::new(lhs), Box::new(self.term()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    lhs = Expr::Mul(Box::new(lhs), Box::new(self.unary()?));
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    lhs = Expr::Div(Box::new(lhs), Box::new(self.unary()?));
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::Reference(path)) => Ok(Expr::Reference(path)),
            Some(Token::LParen) => {
                let inner = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                let function = Function::from_name(&name)
                    .ok_or_else(|| FormulaError::UnknownFunction(name.clone()))?;
                self.expect(Token::LParen)?;
                let mut args = vec![self.expr()?];
                while let Some(Token::Comma) = self.peek() {
                    self.pos += 1;
                    args.push(self.expr()?);
                }
                self.expect(Token::RParen)?;
                Ok(Expr::Call(function, args))
            }
            Some(t) => Err(FormulaError::Syntax(format!("unexpected token {:?}", t))),
            None => Err(FormulaError::Syntax("unexpected end of input".to_string())),
        }
    }
}

/// Parse a formula string into an expression tree
pub fn parse(input: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Ok(Expr::Number(0.0));
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if let Some(extra) = parser.peek() {
        return Err(FormulaError::Syntax(format!("trailing token {:?}", extra)));
    }
    Ok(expr)
}

impl Expr {
    /// Evaluate against a roll-data snapshot
    pub fn eval(&self, data: &RollData) -> Result<f64, FormulaError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Reference(path) => data
                .get(path)
                .ok_or_else(|| FormulaError::UnresolvedReference(path.clone())),
            Expr::Neg(inner) => Ok(-inner.eval(data)?),
            Expr::Add(a, b) => Ok(a.eval(data)? + b.eval(data)?),
            Expr::Sub(a, b) => Ok(a.eval(data)? - b.eval(data)?),
            Expr::Mul(a, b) => Ok(a.eval(data)? * b.eval(data)?),
            Expr::Div(a, b) => {
                let divisor = b.eval(data)?;
                if divisor == 0.0 {
                    return Err(FormulaError::DivisionByZero);
                }
                Ok(a.eval(data)? / divisor)
            }
            Expr::Call(function, args) => {
                let values = args
                    .iter()
                    .map(|a| a.eval(data))
                    .collect::<Result<Vec<_>, _>>()?;
                apply_function(*function, &values)
            }
        }
    }
}

fn apply_function(function: Function, args: &[f64]) -> Result<f64, FormulaError> {
    let single = |name: &str| -> Result<f64, FormulaError> {
        match args {
            [x] => Ok(*x),
            _ => Err(FormulaError::Arity(name.to_string(), args.len())),
        }
    };
    match function {
        Function::Floor => Ok(single("floor")?.floor()),
        Function::Ceil => Ok(single("ceil")?.ceil()),
        Function::Round => Ok(single("round")?.round()),
        Function::Abs => Ok(single("abs")?.abs()),
        Function::Min => args
            .iter()
            .copied()
            .reduce(f64::min)
            .ok_or_else(|| FormulaError::Arity("min".to_string(), 0)),
        Function::Max => args
            .iter()
            .copied()
            .reduce(f64::max)
            .ok_or_else(|| FormulaError::Arity("max".to_string(), 0)),
    }
}
