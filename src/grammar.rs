use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::rc::Rc;

use crate::rules::{Rule, Symbol};
use crate::Err;

/// A probabilistic context-free grammar: a duplicate-free list of rules,
/// indexed by left-hand side, with the nonterminal and terminal
/// vocabularies tracked in insertion order.
///
/// Built once from a rule sequence and read-only afterwards. The lhs of
/// the first rule added is taken as the start symbol.
#[derive(Debug, Default)]
pub struct Grammar {
  rules: Vec<Rc<Rule>>,
  by_lhs: HashMap<Symbol, Vec<Rc<Rule>>>,
  nonterminals: Vec<Symbol>,
  terminals: Vec<Symbol>,
  start: Option<Symbol>,
}

impl Grammar {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
    let mut g = Self::new();
    g.update(rules);
    g
  }

  /// Adds a rule, unless a structurally-equal rule is already present.
  /// Vocabulary growth is monotonic: symbols are registered on first
  /// sight and never removed.
  pub fn add(&mut self, rule: Rule) {
    if self.rules.iter().any(|r| **r == rule) {
      return;
    }

    if self.start.is_none() {
      self.start = Some(rule.lhs.clone());
    }

    self.register(rule.lhs.clone());
    for s in rule.rhs.iter() {
      self.register(s.clone());
    }

    let rule = Rc::new(rule);
    self
      .by_lhs
      .entry(rule.lhs.clone())
      .or_default()
      .push(rule.clone());
    self.rules.push(rule);
  }

  pub fn update(&mut self, rules: impl IntoIterator<Item = Rule>) {
    for rule in rules {
      self.add(rule);
    }
  }

  fn register(&mut self, symbol: Symbol) {
    let vocabulary = if symbol.is_terminal() {
      &mut self.terminals
    } else {
      &mut self.nonterminals
    };
    if !vocabulary.contains(&symbol) {
      vocabulary.push(symbol);
    }
  }

  /// All rules with the given left-hand side, in insertion order. Unknown
  /// symbols yield an empty slice rather than an error.
  pub fn get(&self, lhs: &Symbol) -> &[Rc<Rule>] {
    self.by_lhs.get(lhs).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn rules(&self) -> &[Rc<Rule>] {
    &self.rules
  }

  pub fn nonterminals(&self) -> &[Symbol] {
    &self.nonterminals
  }

  pub fn terminals(&self) -> &[Symbol] {
    &self.terminals
  }

  pub fn binary_rules(&self) -> impl Iterator<Item = &Rc<Rule>> {
    self.rules.iter().filter(|r| r.is_binary())
  }

  pub fn unary_rules(&self) -> impl Iterator<Item = &Rc<Rule>> {
    self.rules.iter().filter(|r| r.len() == 1)
  }

  /// The lhs of the first rule added, if any.
  pub fn start(&self) -> Option<&Symbol> {
    self.start.as_ref()
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Err> {
    fs::read_to_string(path)?.parse()
  }
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for rule in self.rules.iter() {
      writeln!(f, "{}", rule)?;
    }
    Ok(())
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
  fn test_add_is_idempotent() {
    let rule = Rule::new(nt("NP"), vec![t("i")], 1.0);

    let mut once = Grammar::new();
    once.add(rule.clone());

    let mut twice = Grammar::new();
    twice.add(rule.clone());
    twice.add(rule);

    assert_eq!(once.len(), 1);
    assert_eq!(twice.len(), 1);
    assert_eq!(once.nonterminals(), twice.nonterminals());
    assert_eq!(once.terminals(), twice.terminals());
    assert_eq!(twice.get(&nt("NP")).len(), 1);
  }

  #[test]
  fn test_vocabulary_grows_monotonically() {
    let mut g = Grammar::new();
    g.add(Rule::new(nt("S"), vec![nt("NP"), nt("VP")], 1.0));
    assert_eq!(g.nonterminals(), &[nt("S"), nt("NP"), nt("VP")]);
    assert!(g.terminals().is_empty());

    g.add(Rule::new(nt("NP"), vec![t("i")], 1.0));
    assert_eq!(g.nonterminals(), &[nt("S"), nt("NP"), nt("VP")]);
    assert_eq!(g.terminals(), &[t("i")]);

    // same probability, different lhs: a distinct rule, one new terminal
    g.add(Rule::new(nt("VP"), vec![t("sleeps")], 1.0));
    assert_eq!(g.terminals(), &[t("i"), t("sleeps")]);
  }

  #[test]
  fn test_get_unknown_lhs_is_empty() {
    let g = Grammar::from_rules(vec![Rule::new(nt("NP"), vec![t("i")], 1.0)]);
    assert!(g.get(&nt("X")).is_empty());
    assert!(g.get(&t("i")).is_empty());
  }

  #[test]
  fn test_rule_subsets_and_start() {
    let g = Grammar::from_rules(vec![
      Rule::new(nt("S"), vec![nt("NP"), nt("VP")], 1.0),
      Rule::new(nt("NP"), vec![t("i")], 1.0),
      Rule::new(nt("VP"), vec![t("sleeps")], 1.0),
    ]);

    assert_eq!(g.start(), Some(&nt("S")));
    assert_eq!(g.binary_rules().count(), 1);
    assert_eq!(g.unary_rules().count(), 2);
  }
}
