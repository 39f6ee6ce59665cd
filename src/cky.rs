use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::grammar::Grammar;
use crate::rules::Symbol;
use crate::Err;

/// A bijection from nonterminals to dense indices `0..len`, used to
/// address chart rows. Passed explicitly into chart construction so the
/// caller controls (and can reproduce) the enumeration order.
#[derive(Debug, Clone, PartialEq)]
pub struct NtIndex {
  by_symbol: HashMap<Symbol, usize>,
  symbols: Vec<Symbol>,
}

impl NtIndex {
  /// Indexes a grammar's nonterminals in insertion order.
  pub fn from_grammar(g: &Grammar) -> Self {
    let symbols = g.nonterminals().to_vec();
    let by_symbol = symbols
      .iter()
      .cloned()
      .enumerate()
      .map(|(idx, s)| (s, idx))
      .collect();
    Self { by_symbol, symbols }
  }

  /// Builds an index from an explicit mapping, validating up front that it
  /// is a bijection onto `0..len` over nonterminal symbols.
  pub fn new(mapping: HashMap<Symbol, usize>) -> Result<Self, Err> {
    let len = mapping.len();
    let mut slots: Vec<Option<Symbol>> = vec![None; len];

    for (symbol, idx) in mapping.iter() {
      if !symbol.is_nonterminal() {
        return Err(format!("index entry {} is not a nonterminal", symbol).into());
      }
      if *idx >= len {
        return Err(format!("index {} for {} is out of range 0..{}", idx, symbol, len).into());
      }
      if slots[*idx].is_some() {
        return Err(format!("index {} is assigned twice", idx).into());
      }
      slots[*idx] = Some(symbol.clone());
    }

    let symbols = slots
      .into_iter()
      .collect::<Option<Vec<_>>>()
      .ok_or("nonterminal index is not dense")?;

    Ok(Self {
      by_symbol: mapping,
      symbols,
    })
  }

  pub fn get(&self, symbol: &Symbol) -> Option<usize> {
    self.by_symbol.get(symbol).copied()
  }

  pub fn symbol(&self, idx: usize) -> &Symbol {
    &self.symbols[idx]
  }

  pub fn len(&self) -> usize {
    self.symbols.len()
  }

  pub fn is_empty(&self) -> bool {
    self.symbols.is_empty()
  }
}

/// The recorded choice that achieved a chart cell's best score: the split
/// point and the two child nonterminals.
#[derive(Debug, Clone, PartialEq)]
pub struct Backpointer {
  pub split: usize,
  pub left: Symbol,
  pub right: Symbol,
}

/// Viterbi chart for one sentence: parallel score and backpointer tables
/// indexed by `(nonterminal, start, end)` for `0 <= start <= end <= n`.
/// A zero score is the sentinel for "no derivation found".
#[derive(Debug)]
pub struct Chart {
  num_words: usize,
  score: Vec<f64>,
  back: Vec<Option<Backpointer>>,
}

impl Chart {
  fn new(num_nonterminals: usize, num_words: usize) -> Self {
    let size = num_nonterminals * (num_words + 1) * (num_words + 1);
    Self {
      num_words,
      score: vec![0.0; size],
      back: vec![None; size],
    }
  }

  fn cell(&self, nt: usize, start: usize, end: usize) -> usize {
    (nt * (self.num_words + 1) + start) * (self.num_words + 1) + end
  }

  /// The probability of the best known derivation of nonterminal `nt`
  /// over `[start, end)`, or 0 if none was found.
  pub fn score(&self, nt: usize, start: usize, end: usize) -> f64 {
    self.score[self.cell(nt, start, end)]
  }

  pub fn backpointer(&self, nt: usize, start: usize, end: usize) -> Option<&Backpointer> {
    self.back[self.cell(nt, start, end)].as_ref()
  }

  pub fn num_words(&self) -> usize {
    self.num_words
  }

  fn set_score(&mut self, nt: usize, start: usize, end: usize, prob: f64) {
    let cell = self.cell(nt, start, end);
    self.score[cell] = prob;
  }

  fn set_backpointer(&mut self, nt: usize, start: usize, end: usize, bp: Backpointer) {
    let cell = self.cell(nt, start, end);
    self.back[cell] = Some(bp);
  }

  pub fn display<'a>(&'a self, index: &'a NtIndex) -> ChartDisplay<'a> {
    ChartDisplay { chart: self, index }
  }
}

/// Renders the nonzero chart entries grouped by span, shortest first.
pub struct ChartDisplay<'a> {
  chart: &'a Chart,
  index: &'a NtIndex,
}

impl fmt::Display for ChartDisplay<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let n = self.chart.num_words;
    for r in 1..=n {
      for i in 0..=(n - r) {
        let j = i + r;
        for nt in 0..self.index.len() {
          let score = self.chart.score(nt, i, j);
          if score == 0.0 {
            continue;
          }
          write!(f, "{}..{}: {} = {}", i, j, self.index.symbol(nt), score)?;
          if let Some(bp) = self.chart.backpointer(nt, i, j) {
            write!(f, " ({} {} | split {})", bp.left, bp.right, bp.split)?;
          }
          writeln!(f)?;
        }
      }
    }
    Ok(())
  }
}

/// Fills in the Viterbi CKY chart for `input` bottom-up.
///
/// `index` must cover exactly the grammar's nonterminals; entries missing
/// from it panic rather than parse incorrectly.
///
/// Length-1 spans are seeded from lexical rules; longer spans take, over
/// every split point and every binary rule, the maximum of
/// `rule.prob * score(left) * score(right)`. Only strictly greater
/// candidates replace a cell, so among equal-probability derivations the
/// first one encountered wins. Unary rules over nonterminals are never
/// applied above length-1 spans; the grammar is expected to be binarized
/// with lexical-only unary rules.
pub fn parse_chart(g: &Grammar, input: &[&str], index: &NtIndex) -> Chart {
  let num_words = input.len();
  let mut chart = Chart::new(index.len(), num_words);

  // lexical pass: every rule matching the word overwrites the cell, so
  // with several lexical rules for the same (nonterminal, word) the last
  // one in rule order wins, regardless of probability
  for (j, word) in input.iter().enumerate() {
    for nt in g.nonterminals() {
      let a = index.get(nt).expect("nonterminal missing from index");
      for rule in g.get(nt) {
        if rule.is_lexical() && matches!(&rule.rhs[0], Symbol::Terminal(w) if w == word) {
          let prob = rule.prob.expect("grammar rule without probability");
          trace!(symbol = %nt, position = j, prob, "matched lexical rule");
          chart.set_score(a, j, j + 1, prob);
        }
      }
    }
  }

  // spans of length r only depend on spans of length < r
  for r in 2..=num_words {
    for i in 0..=(num_words - r) {
      let j = i + r;
      for nt in g.nonterminals() {
        let a = index.get(nt).expect("nonterminal missing from index");
        let rules = g.get(nt);
        for k in (i + 1)..j {
          for left in g.nonterminals() {
            let b = index.get(left).expect("nonterminal missing from index");
            for right in g.nonterminals() {
              let c = index.get(right).expect("nonterminal missing from index");
              for rule in rules
                .iter()
                .filter(|rule| rule.is_binary() && rule.rhs[0] == *left && rule.rhs[1] == *right)
              {
                let prob = rule.prob.expect("grammar rule without probability");
                let candidate = prob * chart.score(b, i, k) * chart.score(c, k, j);
                if candidate != 0.0 && candidate > chart.score(a, i, j) {
                  trace!(
                    symbol = %nt,
                    start = i,
                    end = j,
                    split = k,
                    score = candidate,
                    "new best derivation"
                  );
                  chart.set_score(a, i, j, candidate);
                  chart.set_backpointer(
                    a,
                    i,
                    j,
                    Backpointer {
                      split: k,
                      left: left.clone(),
                      right: right.clone(),
                    },
                  );
                }
              }
            }
          }
        }
      }
    }
  }

  debug!(words = num_words, nonterminals = index.len(), "chart complete");
  chart
}
