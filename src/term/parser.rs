use super::Term;
use super::arena::TermArena;
use super::syntax::{Connector, Copula, DIVIDER, STATEMENT_CLOSE, STATEMENT_OPEN, VariableKind};
use crate::error::ParseError;

/// Walks a term string yielding each token position together with the
/// bracket depth in effect before it. Copula tokens that contain bracket
/// characters (`{--`, `--]`, `{-]`) are yielded as one opaque token.
struct DepthScan<'a> {
    text: &'a str,
    pos: usize,
    depth: i32,
}

impl<'a> DepthScan<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
        }
    }
}

impl Iterator for DepthScan<'_> {
    type Item = (usize, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.text.get(self.pos..)?;
        let c = rest.chars().next()?;
        let at = (self.pos, self.depth);
        if Copula::match_prefix(rest).is_some_and(Copula::is_bracketed) {
            self.pos += Copula::WIDTH;
            return Some(at);
        }
        match c {
            '(' | '{' | '[' => self.depth += 1,
            ')' | '}' | ']' => self.depth -= 1,
            _ => {}
        }
        self.pos += c.len_utf8();
        Some(at)
    }
}

fn check_balanced(text: &str) -> Result<(), ParseError> {
    let mut stack = Vec::new();
    let mut pos = 0;
    while let Some(rest) = text.get(pos..) {
        let Some(c) = rest.chars().next() else { break };
        if Copula::match_prefix(rest).is_some_and(Copula::is_bracketed) {
            pos += Copula::WIDTH;
            continue;
        }
        match c {
            '(' => stack.push(')'),
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            ')' | '}' | ']' => {
                if stack.pop() != Some(c) {
                    return Err(ParseError::Unbalanced { position: pos });
                }
            }
            _ => {}
        }
        pos += c.len_utf8();
    }
    if stack.is_empty() {
        Ok(())
    } else {
        Err(ParseError::Unbalanced { position: text.len() })
    }
}

pub(super) fn parse(arena: &TermArena, text: &str) -> Result<Term, ParseError> {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if stripped.is_empty() {
        return Err(ParseError::Empty);
    }
    check_balanced(&stripped)?;
    parse_term(arena, &stripped)
}

fn parse_term(arena: &TermArena, s: &str) -> Result<Term, ParseError> {
    if let Some(existing) = arena.get(s) {
        return Ok(existing);
    }
    let first = s.chars().next().ok_or(ParseError::Empty)?;
    if first == STATEMENT_OPEN {
        if !s.ends_with(STATEMENT_CLOSE) {
            return Err(ParseError::Unbalanced { position: s.len() });
        }
        match top_level_copula(s) {
            Some((copula, at)) => parse_statement(arena, s, copula, at),
            None => parse_compound(arena, s),
        }
    } else if let Some(connector) = Connector::from_set_open(first) {
        parse_set(arena, s, connector)
    } else if let Some(kind) = VariableKind::from_sigil(first) {
        parse_variable(arena, s, kind)
    } else {
        parse_atom(arena, s)
    }
}

fn top_level_copula(s: &str) -> Option<(Copula, usize)> {
    DepthScan::new(s)
        .filter(|&(_, depth)| depth == 1)
        .find_map(|(at, _)| s.get(at..).and_then(Copula::match_prefix).map(|c| (c, at)))
}

fn parse_statement(
    arena: &TermArena,
    s: &str,
    copula: Copula,
    at: usize,
) -> Result<Term, ParseError> {
    let subject = &s[1..at];
    let predicate = &s[at + Copula::WIDTH..s.len() - 1];
    if subject.is_empty() || predicate.is_empty() {
        return Err(ParseError::MissingOperand(s.to_string()));
    }
    let subject = parse_term(arena, subject)?;
    let predicate = parse_term(arena, predicate)?;
    Ok(arena.statement(subject, predicate, copula))
}

/// Pieces of `inner` separated by dividers at nesting depth zero.
fn split_top_level(inner: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    for (at, depth) in DepthScan::new(inner) {
        if depth == 0 && inner[at..].starts_with(DIVIDER) {
            pieces.push(&inner[start..at]);
            start = at + 1;
        }
    }
    pieces.push(&inner[start..]);
    pieces
}

fn parse_compound(arena: &TermArena, s: &str) -> Result<Term, ParseError> {
    let inner = &s[1..s.len() - 1];
    let symbol_len = if inner.get(1..).is_some_and(|rest| rest.starts_with(DIVIDER)) {
        1
    } else {
        2
    };
    let symbol = inner
        .get(..symbol_len)
        .ok_or_else(|| ParseError::UnknownConnector(s.to_string()))?;
    let connector =
        Connector::from_symbol(symbol).ok_or_else(|| ParseError::UnknownConnector(s.to_string()))?;
    let body = inner
        .get(symbol_len..)
        .and_then(|rest| rest.strip_prefix(DIVIDER))
        .ok_or_else(|| ParseError::MissingOperand(s.to_string()))?;

    let mut subterms = Vec::new();
    let mut intervals = Vec::new();
    for piece in split_top_level(body) {
        if piece.is_empty() {
            return Err(ParseError::MissingOperand(s.to_string()));
        }
        match piece.parse::<i64>() {
            Ok(interval) => intervals.push(interval),
            Err(_) => subterms.push(parse_term(arena, piece)?),
        }
    }
    if subterms.is_empty() {
        return Err(ParseError::MissingOperand(s.to_string()));
    }
    Ok(arena.compound_with_intervals(connector, subterms, intervals))
}

fn parse_set(arena: &TermArena, s: &str, connector: Connector) -> Result<Term, ParseError> {
    let close = connector
        .set_close()
        .ok_or_else(|| ParseError::UnknownConnector(s.to_string()))?;
    if !s.ends_with(close) {
        return Err(ParseError::Unbalanced { position: s.len() });
    }
    let inner = &s[1..s.len() - 1];
    if inner.is_empty() {
        return Err(ParseError::MissingOperand(s.to_string()));
    }
    let subterms = split_top_level(inner)
        .into_iter()
        .map(|piece| {
            if piece.is_empty() {
                Err(ParseError::MissingOperand(s.to_string()))
            } else {
                parse_term(arena, piece)
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(arena.compound(connector, subterms))
}

fn is_word(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '^')
}

fn parse_variable(arena: &TermArena, s: &str, kind: VariableKind) -> Result<Term, ParseError> {
    let name = &s[1..];
    if !is_word(name) {
        return Err(ParseError::InvalidVariable(s.to_string()));
    }
    Ok(arena.variable(name, kind))
}

fn parse_atom(arena: &TermArena, s: &str) -> Result<Term, ParseError> {
    let mut name = s;
    if let Some((head, tail)) = s.rsplit_once(DIVIDER) {
        if !tail.is_empty() && tail.bytes().all(|b| b.is_ascii_digit()) {
            name = head;
        }
    }
    if !is_word(name) {
        let found = name
            .char_indices()
            .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == '^'));
        return Err(match found {
            Some((position, found)) => ParseError::UnexpectedCharacter { found, position },
            None => ParseError::InvalidAtom(s.to_string()),
        });
    }
    Ok(arena.atomic(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsing_twice_returns_the_same_node() {
        let arena = TermArena::new();
        for text in [
            "(grass --> n1x_p0y)",
            "((*,{SELF},p0x_p0y) --> eat)",
            "((&/,(grass --> #x),((*,{SELF},#x) --> move)) =/> (ENERGY --> INCREASING))",
            "{SELF}",
            "$y",
        ] {
            let a = arena.parse(text).unwrap();
            let b = arena.parse(text).unwrap();
            assert!(a.ptr_eq(&b), "{text}");
            let again = arena.parse(a.as_str()).unwrap();
            assert!(again.ptr_eq(&a), "{text}");
        }
    }

    #[test]
    fn whitespace_is_insignificant() {
        let arena = TermArena::new();
        let a = arena.parse("( grass   -->  n1x_p0y )").unwrap();
        assert_eq!(a.as_str(), "(grass --> n1x_p0y)");
        let b = arena.parse("((*, {SELF}, p0x_p0y) --> eat)").unwrap();
        assert_eq!(b.as_str(), "((*,{SELF},p0x_p0y) --> eat)");
    }

    #[test]
    fn symmetric_copula_orders_operands() {
        let arena = TermArena::new();
        let ba = arena.parse("(b <-> a)").unwrap();
        let ab = arena.parse("(a <-> b)").unwrap();
        assert!(ba.ptr_eq(&ab));
        assert_eq!(ab.as_str(), "(a <-> b)");
        let asym = arena.parse("(b --> a)").unwrap();
        assert_eq!(asym.as_str(), "(b --> a)");
    }

    #[test]
    fn permuted_order_invariant_compounds_match() {
        let arena = TermArena::new();
        let x = arena.parse("(&&,c,(a --> b),d)").unwrap();
        let y = arena.parse("(&&,d,c,(a --> b))").unwrap();
        assert_eq!(x.as_str(), y.as_str());
        let px = arena.parse("(&|,q,p)").unwrap();
        let py = arena.parse("(&|,p,q)").unwrap();
        assert!(px.ptr_eq(&py));
    }

    #[test]
    fn integer_pieces_become_intervals() {
        let arena = TermArena::new();
        let t = arena.parse("(&/,a,5,b)").unwrap();
        assert_eq!(t.as_str(), "(&/,a,b)");
        assert_eq!(t.subterms().len(), 2);
        assert_eq!(t.intervals(), &[5]);
    }

    #[test]
    fn interval_suffix_on_bare_word_is_stripped() {
        let arena = TermArena::new();
        assert_eq!(arena.parse("grass,12").unwrap().as_str(), "grass");
    }

    #[test]
    fn bracketed_copulas_parse() {
        let arena = TermArena::new();
        let t = arena.parse("(tweety {-- bird)").unwrap();
        assert_eq!(t.copula(), Some(Copula::Instance));
        let p = arena.parse("(raven --] black)").unwrap();
        assert_eq!(p.copula(), Some(Copula::Property));
        let ip = arena.parse("(tweety {-] yellow)").unwrap();
        assert_eq!(ip.copula(), Some(Copula::InstanceProperty));
    }

    #[test]
    fn multi_element_set_text_normalizes() {
        let arena = TermArena::new();
        let t = arena.parse("{b,a}").unwrap();
        assert_eq!(t.as_str(), "(|,{a},{b})");
    }

    #[test]
    fn malformed_text_is_rejected() {
        let arena = TermArena::new();
        assert_eq!(arena.parse("   "), Err(ParseError::Empty));
        assert!(matches!(
            arena.parse("((a --> b)"),
            Err(ParseError::Unbalanced { .. })
        ));
        assert!(matches!(
            arena.parse("(a --> b]"),
            Err(ParseError::Unbalanced { .. })
        ));
        assert!(matches!(
            arena.parse("(%,a,b)"),
            Err(ParseError::UnknownConnector(_))
        ));
        assert!(matches!(arena.parse("#"), Err(ParseError::InvalidVariable(_))));
        assert!(matches!(
            arena.parse("(a --> )"),
            Err(ParseError::MissingOperand(_))
        ));
        assert!(matches!(
            arena.parse("gr@ss"),
            Err(ParseError::UnexpectedCharacter { found: '@', .. })
        ));
        assert!(matches!(
            arena.parse("(&/,a,,b)"),
            Err(ParseError::MissingOperand(_))
        ));
    }
}
