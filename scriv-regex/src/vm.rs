use crate::inst::{Atom, Inst, Quant};
use crate::program::Program;

/// Hard cap on positions collected for a single quantified atom, defense
/// against `.*.*.*`-style blowups: once a repetition would collect more
/// than this many candidate lengths, the match fails outright rather than
/// backtracking through an exponential search space.
const MAX_POSITIONS: usize = 4096;

fn is_line_start(text: &[u8], pos: usize) -> bool {
    pos == 0 || text[pos - 1] == b'\n'
}

fn is_line_end(text: &[u8], pos: usize) -> bool {
    pos == text.len() || text[pos] == b'\n'
}

/// Try to match `insts` starting at `pos`, returning the end position on
/// success.
fn match_from(text: &[u8], pos: usize, insts: &[Inst]) -> Option<usize> {
    match insts.split_first() {
        None => Some(pos),
        Some((inst, rest)) => match inst {
            Inst::AnchorStart => is_line_start(text, pos).then(|| match_from(text, pos, rest)).flatten(),
            Inst::AnchorEnd => is_line_end(text, pos).then(|| match_from(text, pos, rest)).flatten(),
            Inst::Atom(atom) => {
                if pos < text.len() && atom.matches(text[pos]) {
                    match_from(text, pos + 1, rest)
                } else {
                    None
                }
            }
            Inst::Quantified(atom, quant) => match_quantified(text, pos, atom, quant, rest),
        },
    }
}

/// Greedy bounded-backtracking repetition: collect every position reachable
/// by repeating `atom` (capped by `quant.max` and [`MAX_POSITIONS`]), then
/// try the remaining program starting from the longest down to the
/// shortest, refusing to backtrack past `quant.min` repetitions.
fn match_quantified(text: &[u8], pos: usize, atom: &Atom, quant: &Quant, rest: &[Inst]) -> Option<usize> {
    let mut positions = vec![pos];
    let max = quant.max.unwrap_or(MAX_POSITIONS);
    let mut cursor = pos;
    let mut count = 0;

    while count < max {
        if cursor >= text.len() || !atom.matches(text[cursor]) {
            break;
        }
        cursor += 1;
        count += 1;
        if positions.len() >= MAX_POSITIONS {
            return None;
        }
        positions.push(cursor);
    }

    for (consumed, &p) in positions.iter().enumerate().rev() {
        if consumed < quant.min {
            break;
        }
        if let Some(end) = match_from(text, p, rest) {
            return Some(end);
        }
    }

    None
}

pub(crate) fn search(program: &Program, text: &[u8], start: usize) -> Option<(usize, usize)> {
    if start > text.len() {
        return None;
    }

    if program.is_anchored_start() {
        (start..=text.len())
            .filter(|&pos| is_line_start(text, pos))
            .find_map(|pos| match_from(text, pos, &program.insts).map(|end| (pos, end)))
    } else {
        (start..=text.len()).find_map(|pos| match_from(text, pos, &program.insts).map(|end| (pos, end)))
    }
}

pub(crate) fn search_backward(program: &Program, text: &[u8], start: usize) -> Option<(usize, usize)> {
    if start == 0 {
        return None;
    }
    let from = (start - 1).min(text.len());
    (0..=from)
        .rev()
        .find_map(|pos| match_from(text, pos, &program.insts).map(|end| (pos, end)))
}
