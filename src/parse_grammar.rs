use regex::Regex;
/// Reading grammars from the `LHS ||| RHS ||| PROB` line format
use std::str::FromStr;

use crate::grammar::Grammar;
use crate::rules::{Rule, Symbol};
use crate::Err;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

/// A field is a nonterminal iff it is wrapped in square brackets.
fn parse_symbol(field: &str) -> Symbol {
  regex_static!(NONTERMINAL, r"^\[(.+)\]$");

  if let Some(caps) = NONTERMINAL.captures(field) {
    Symbol::nonterminal(caps[1].to_string())
  } else {
    Symbol::terminal(field.to_string())
  }
}

fn parse_rule(line: &str) -> Result<Rule, Err> {
  let fields = line.split("|||").collect::<Vec<_>>();
  if fields.len() != 3 {
    return Err(format!("expected 3 '|||'-separated fields, got {}: {}", fields.len(), line).into());
  }

  let lhs = parse_symbol(fields[0].trim());
  let rhs = fields[1].split_whitespace().map(parse_symbol).collect();
  let prob = fields[2]
    .trim()
    .parse::<f64>()
    .map_err(|e| -> Err { format!("bad probability in '{}': {}", line, e).into() })?;

  Ok(Rule::new(lhs, rhs, prob))
}

/// Parses one rule per line, skipping blank lines and // comments.
pub fn parse_rules(s: &str) -> Result<Vec<Rule>, Err> {
  s.lines()
    .map(str::trim)
    .filter(|line| !line.is_empty() && !line.starts_with("//"))
    .map(parse_rule)
    .collect()
}

impl FromStr for Grammar {
  type Err = Err;

  /// Parses a grammar from a string. The first rule's lhs becomes the
  /// start symbol.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let rules = parse_rules(s)?;
    if rules.is_empty() {
      Err("empty ruleset".into())
    } else {
      Ok(Self::from_rules(rules))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn nt(l: &str) -> Symbol {
    Symbol::nonterminal(l.to_string())
  }

  fn t(w: &str) -> Symbol {
    Symbol::terminal(w.to_string())
  }

  #[test]
  fn test_parse_rules() {
    let rules = parse_rules(
      r#"
        // toy grammar
        [S] ||| [NP] [VP] ||| 1.0

        [NP] ||| i ||| 0.5
      "#,
    )
    .unwrap();

    assert_eq!(
      rules,
      vec![
        Rule::new(nt("S"), vec![nt("NP"), nt("VP")], 1.0),
        Rule::new(nt("NP"), vec![t("i")], 0.5),
      ]
    );
  }

  #[test]
  fn test_grammar_from_str() {
    let g: Grammar = r#"
      [S] ||| [NP] [VP] ||| 1.0
      [NP] ||| i ||| 1.0
      [VP] ||| sleeps ||| 1.0
    "#
    .parse()
    .unwrap();

    assert_eq!(g.len(), 3);
    assert_eq!(g.start(), Some(&nt("S")));
    assert_eq!(g.terminals(), &[t("i"), t("sleeps")]);
  }

  #[test]
  fn test_wrong_field_count_is_fatal() {
    let err = parse_rules("[S] ||| [NP] [VP]").unwrap_err();
    assert!(err.to_string().contains("[S] ||| [NP] [VP]"), "{}", err);

    assert!(parse_rules("[S] ||| [NP] ||| [VP] ||| 1.0").is_err());
  }

  #[test]
  fn test_bad_probability_is_fatal() {
    assert!(parse_rules("[S] ||| [NP] [VP] ||| one").is_err());
  }

  #[test]
  fn test_empty_ruleset_is_fatal() {
    assert!("// nothing but comments\n".parse::<Grammar>().is_err());
  }
}
