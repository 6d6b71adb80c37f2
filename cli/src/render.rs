use std::fmt::Write;
use sweeper_core::{Face, SessionView, TileGlyph};

fn face_symbol(face: Face) -> &'static str {
    match face {
        Face::Idle => ":)",
        Face::Down => "[]",
        Face::Ooh => ":o",
        Face::Dead => "x(",
        Face::Win => "B)",
    }
}

fn glyph_symbol(glyph: TileGlyph) -> char {
    use TileGlyph::*;
    match glyph {
        Button => '#',
        Flag => 'F',
        Question => '?',
        Pressed => '_',
        QuestionPressed => ';',
        Number(0) => '.',
        Number(count) => char::from(b'0' + count.min(8)),
        Mine => '*',
        MineHit => 'X',
        NoMine => '!',
    }
}

/// Counter line shown above the board and on every tick.
pub(crate) fn status_line(view: &SessionView) -> String {
    format!(
        "[{}]  {}  [{}]",
        view.mine_counter,
        face_symbol(view.face),
        view.time_counter
    )
}

pub(crate) fn board(view: &SessionView) -> String {
    let mut out = String::new();
    let width = usize::from(view.size.0);

    let _ = writeln!(out, "{}", status_line(view));
    out.push_str("   ");
    for x in 0..width {
        let _ = write!(out, "{}", x % 10);
    }
    out.push('\n');

    for (y, row) in view.rows.iter().enumerate() {
        let _ = write!(out, "{:>2} ", y);
        out.extend(row.iter().map(|&glyph| glyph_symbol(glyph)));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use sweeper_core::{FixedMineGenerator, GameConfig, GameSession, PointerButtons, PointerTarget};

    #[test]
    fn renders_counters_face_and_grid() {
        let config = GameConfig::new((4, 2), 1).unwrap();
        let mut session =
            GameSession::with_generator(config, FixedMineGenerator::new(&[(3, 1)]), 0).unwrap();
        session.pointer_down(PointerButtons::RIGHT, PointerTarget::Cell((3, 0)));
        session.pointer_down(PointerButtons::RIGHT, PointerTarget::Cell((2, 0)));

        let text = board(&session.view());

        assert_eq!(
            text,
            "[-01]  :)  [000]\n   0123\n 0 ##FF\n 1 ####\n"
        );
    }

    #[test]
    fn numbers_and_blanks_have_symbols() {
        assert_eq!(glyph_symbol(TileGlyph::Number(0)), '.');
        assert_eq!(glyph_symbol(TileGlyph::Number(3)), '3');
        assert_eq!(glyph_symbol(TileGlyph::MineHit), 'X');
    }
}
