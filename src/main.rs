use bracken::{Err, Grammar};

// the classic PP-attachment ambiguity: did you shoot while wearing
// pajamas, or shoot an elephant that was wearing them?
const GRAMMAR: &str = r#"
    [S] ||| [NP] [VP] ||| 1.0
    [NP] ||| [Det] [N] ||| 0.4
    [NP] ||| [NP] [PP] ||| 0.2
    [NP] ||| i ||| 0.1
    [VP] ||| [V] [NP] ||| 0.6
    [VP] ||| [VP] [PP] ||| 0.4
    [PP] ||| [P] [NP] ||| 1.0
    [Det] ||| an ||| 0.5
    [Det] ||| my ||| 0.5
    [N] ||| elephant ||| 0.5
    [N] ||| pajamas ||| 0.5
    [V] ||| shot ||| 1.0
    [P] ||| in ||| 1.0
"#;

fn main() -> Result<(), Err> {
  let g: Grammar = GRAMMAR.parse()?;

  let sentence = "I shot an elephant in my pajamas".to_ascii_lowercase();
  let sentence = sentence.split(' ').collect::<Vec<_>>();

  let parse = g.parse(&sentence)?;

  println!("p = {}", parse.prob);
  println!("{}", parse.tree());

  Ok(())
}
