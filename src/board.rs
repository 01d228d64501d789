use crate::error::CoordParseError;
use crate::pieces::{Player, Unit, UnitType};
use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DIM: u8 = 5;

const ROW_LABELS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const COL_LABELS: &[u8] = b"0123456789abcdef";

/// Characters ignored when parsing typed coordinates, e.g. "A3 B2" or "a3-b2".
const SEPARATORS: [char; 7] = [' ', ',', '.', ':', ';', '-', '_'];

// ==================== Coordinates ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Coord { row, col }
    }

    pub fn row_label(&self) -> char {
        usize::try_from(self.row)
            .ok()
            .and_then(|r| ROW_LABELS.get(r))
            .map_or('?', |&b| b as char)
    }

    pub fn col_label(&self) -> char {
        usize::try_from(self.col)
            .ok()
            .and_then(|c| COL_LABELS.get(c))
            .map_or('?', |&b| b as char)
    }

    /// Orthogonal neighbours in up, left, down, right order. May leave the board.
    #[inline]
    pub fn adjacent(&self) -> [Coord; 4] {
        [
            Coord::new(self.row - 1, self.col),
            Coord::new(self.row, self.col - 1),
            Coord::new(self.row + 1, self.col),
            Coord::new(self.row, self.col + 1),
        ]
    }

    /// One orthogonal step apart.
    #[inline]
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        (self.row - other.row).abs() + (self.col - other.col).abs() == 1
    }

    /// Every coordinate of the square of half-width `dist` centred here, self included.
    pub fn iter_range(&self, dist: i32) -> impl Iterator<Item = Coord> + use<> {
        let center = *self;
        (center.row - dist..=center.row + dist).flat_map(move |row| {
            (center.col - dist..=center.col + dist).map(move |col| Coord::new(row, col))
        })
    }

    fn from_label_chars(row: char, col: char) -> Result<Coord, CoordParseError> {
        let row_index = ROW_LABELS
            .iter()
            .position(|&b| b as char == row.to_ascii_uppercase())
            .ok_or(CoordParseError::Row(row))?;
        let col_index = COL_LABELS
            .iter()
            .position(|&b| b as char == col.to_ascii_lowercase())
            .ok_or(CoordParseError::Column(col))?;
        Ok(Coord::new(row_index as i32, col_index as i32))
    }
}

/// Strip whitespace and separators, then require exactly `expected` characters.
fn normalized_chars(s: &str, expected: usize) -> Result<Vec<char>, CoordParseError> {
    let chars: Vec<char> = s
        .trim()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect();
    if chars.len() != expected {
        return Err(CoordParseError::Length {
            expected,
            found: chars.len(),
        });
    }
    Ok(chars)
}

impl FromStr for Coord {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = normalized_chars(s, 2)?;
        Coord::from_label_chars(chars[0], chars[1])
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_label(), self.col_label())
    }
}

/// A move (source and destination) or an inclusive rectangle given by two corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoordPair {
    pub src: Coord,
    pub dst: Coord,
}

impl CoordPair {
    pub const fn new(src: Coord, dst: Coord) -> Self {
        CoordPair { src, dst }
    }

    pub const fn from_quad(row0: i32, col0: i32, row1: i32, col1: i32) -> Self {
        CoordPair::new(Coord::new(row0, col0), Coord::new(row1, col1))
    }

    /// The whole `dim`-sized board as a rectangle.
    pub const fn from_dim(dim: u8) -> Self {
        CoordPair::from_quad(0, 0, dim as i32 - 1, dim as i32 - 1)
    }

    #[inline]
    pub fn is_self_destruct(&self) -> bool {
        self.src == self.dst
    }

    /// Cells of the rectangle in row-major order.
    pub fn iter_rectangle(&self) -> impl Iterator<Item = Coord> + use<> {
        let (src, dst) = (self.src, self.dst);
        (src.row..=dst.row)
            .flat_map(move |row| (src.col..=dst.col).map(move |col| Coord::new(row, col)))
    }
}

impl FromStr for CoordPair {
    type Err = CoordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars = normalized_chars(s, 4)?;
        Ok(CoordPair::new(
            Coord::from_label_chars(chars[0], chars[1])?,
            Coord::from_label_chars(chars[2], chars[3])?,
        ))
    }
}

impl fmt::Display for CoordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.src, self.dst)
    }
}

// ==================== Board ====================

/// Square grid of optional units.
///
/// The has-AI flags are only ever cleared when an AI unit dies in
/// `mod_health`, so win checks never scan the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    dim: u8,
    cells: SmallVec<[Option<Unit>; 64]>,
    attacker_has_ai: bool,
    defender_has_ai: bool,
}

impl Board {
    /// Empty board. Neither side has an AI until one is placed.
    pub fn new(dim: u8) -> Self {
        let size = dim as usize * dim as usize;
        Board {
            dim,
            cells: SmallVec::from_elem(None, size),
            attacker_has_ai: false,
            defender_has_ai: false,
        }
    }

    /// Opening position: defender in the top-left corner, attacker mirrored bottom-right.
    pub fn with_default_layout(dim: u8) -> Self {
        let mut board = Board::new(dim);
        let md = dim as i32 - 1;

        board.place(Coord::new(0, 0), Unit::new(Player::Defender, UnitType::AI));
        board.place(Coord::new(1, 0), Unit::new(Player::Defender, UnitType::Tech));
        board.place(Coord::new(0, 1), Unit::new(Player::Defender, UnitType::Tech));
        board.place(Coord::new(2, 0), Unit::new(Player::Defender, UnitType::Firewall));
        board.place(Coord::new(0, 2), Unit::new(Player::Defender, UnitType::Firewall));
        board.place(Coord::new(1, 1), Unit::new(Player::Defender, UnitType::Program));

        board.place(Coord::new(md, md), Unit::new(Player::Attacker, UnitType::AI));
        board.place(Coord::new(md - 1, md), Unit::new(Player::Attacker, UnitType::Virus));
        board.place(Coord::new(md, md - 1), Unit::new(Player::Attacker, UnitType::Virus));
        board.place(Coord::new(md - 2, md), Unit::new(Player::Attacker, UnitType::Program));
        board.place(Coord::new(md, md - 2), Unit::new(Player::Attacker, UnitType::Program));
        board.place(Coord::new(md - 1, md - 1), Unit::new(Player::Attacker, UnitType::Firewall));

        board
    }

    #[inline]
    pub fn dim(&self) -> u8 {
        self.dim
    }

    #[inline]
    pub fn is_valid_coord(&self, coord: Coord) -> bool {
        let dim = self.dim as i32;
        coord.row >= 0 && coord.row < dim && coord.col >= 0 && coord.col < dim
    }

    #[inline]
    fn index(&self, coord: Coord) -> usize {
        coord.row as usize * self.dim as usize + coord.col as usize
    }

    /// Unit at `coord`, `None` when empty or off the board.
    #[inline]
    pub fn get(&self, coord: Coord) -> Option<&Unit> {
        if self.is_valid_coord(coord) {
            self.cells[self.index(coord)].as_ref()
        } else {
            None
        }
    }

    /// Whether `coord` holds no unit. Off-board cells count as empty.
    #[inline]
    pub fn is_empty(&self, coord: Coord) -> bool {
        self.get(coord).is_none()
    }

    /// Put a unit on the board, replacing whatever was there. Used to build positions.
    pub fn place(&mut self, coord: Coord, unit: Unit) {
        if !self.is_valid_coord(coord) {
            return;
        }
        if unit.kind == UnitType::AI {
            match unit.player {
                Player::Attacker => self.attacker_has_ai = true,
                Player::Defender => self.defender_has_ai = true,
            }
        }
        let idx = self.index(coord);
        self.cells[idx] = Some(unit);
    }

    /// Move whatever is on `src` to `dst`, leaving `src` empty.
    pub(crate) fn relocate(&mut self, src: Coord, dst: Coord) {
        if !self.is_valid_coord(src) || !self.is_valid_coord(dst) {
            return;
        }
        let (src_idx, dst_idx) = (self.index(src), self.index(dst));
        let unit = self.cells[src_idx].take();
        self.cells[dst_idx] = unit;
    }

    /// Change the health of the unit at `coord` (if any), removing it once it reaches 0.
    pub fn mod_health(&mut self, coord: Coord, delta: i32) {
        if !self.is_valid_coord(coord) {
            return;
        }
        let idx = self.index(coord);
        if let Some(unit) = self.cells[idx].as_mut() {
            unit.mod_health(delta);
            self.remove_dead(coord);
        }
    }

    fn remove_dead(&mut self, coord: Coord) {
        let idx = self.index(coord);
        let dead = match &self.cells[idx] {
            Some(unit) if !unit.is_alive() => *unit,
            _ => return,
        };
        self.cells[idx] = None;
        if dead.kind == UnitType::AI {
            match dead.player {
                Player::Attacker => self.attacker_has_ai = false,
                Player::Defender => self.defender_has_ai = false,
            }
        }
    }

    #[inline]
    pub fn has_ai(&self, player: Player) -> bool {
        match player {
            Player::Attacker => self.attacker_has_ai,
            Player::Defender => self.defender_has_ai,
        }
    }

    /// All units in row-major order.
    pub fn units(&self) -> impl Iterator<Item = (Coord, &Unit)> + '_ {
        let dim = self.dim as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|unit| (Coord::new((i / dim) as i32, (i % dim) as i32), unit))
        })
    }

    pub fn player_units(&self, player: Player) -> impl Iterator<Item = (Coord, &Unit)> + '_ {
        self.units().filter(move |(_, unit)| unit.player == player)
    }

    /// On-board orthogonal neighbours of `coord`.
    pub fn neighbours(&self, coord: Coord) -> ArrayVec<Coord, 4> {
        coord
            .adjacent()
            .into_iter()
            .filter(|c| self.is_valid_coord(*c))
            .collect()
    }

    /// Whether any enemy of `player` sits orthogonally next to `coord`.
    pub fn is_engaged(&self, coord: Coord, player: Player) -> bool {
        self.neighbours(coord)
            .iter()
            .any(|c| self.get(*c).is_some_and(|u| u.player != player))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("   ")?;
        for col in 0..self.dim as i32 {
            write!(f, "{:^3} ", Coord::new(0, col).col_label())?;
        }
        writeln!(f)?;
        for row in 0..self.dim as i32 {
            write!(f, "{}: ", Coord::new(row, 0).row_label())?;
            for col in 0..self.dim as i32 {
                match self.get(Coord::new(row, col)) {
                    Some(unit) => write!(f, "{:^3} ", unit)?,
                    None => f.write_str(" .  ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relocate_vacates_source() {
        let mut board = Board::new(4);
        let unit = Unit::new(Player::Defender, UnitType::Tech);
        board.place(Coord::new(1, 1), unit);
        board.relocate(Coord::new(1, 1), Coord::new(1, 2));
        assert!(board.is_empty(Coord::new(1, 1)));
        assert_eq!(board.get(Coord::new(1, 2)), Some(&unit));
        // Off-board targets are ignored.
        board.relocate(Coord::new(1, 2), Coord::new(1, 4));
        assert_eq!(board.get(Coord::new(1, 2)), Some(&unit));
    }

    #[test]
    fn test_extreme_heal_keeps_unit() {
        let mut board = Board::new(4);
        let coord = Coord::new(0, 0);
        board.place(coord, Unit::with_health(Player::Defender, UnitType::AI, 5));
        board.mod_health(coord, i32::MAX);
        assert_eq!(board.get(coord).map(|u| u.health), Some(crate::pieces::MAX_HEALTH));
        assert!(board.has_ai(Player::Defender));
        board.mod_health(coord, i32::MIN);
        assert!(board.is_empty(coord));
        assert!(!board.has_ai(Player::Defender));
    }

    #[test]
    fn test_coord_labels_roundtrip() {
        let c: Coord = "D2".parse().unwrap();
        assert_eq!(c, Coord::new(3, 2));
        assert_eq!(c.to_string(), "D2");
        assert_eq!(Coord::new(0, 15).to_string(), "Af");
        assert_eq!(Coord::new(-1, 16).to_string(), "??");
    }

    #[test]
    fn test_coord_rejects_bad_text() {
        assert!(matches!(
            "D".parse::<Coord>(),
            Err(CoordParseError::Length { expected: 2, found: 1 })
        ));
        assert_eq!("Dg".parse::<Coord>(), Err(CoordParseError::Column('g')));
        assert_eq!("?1".parse::<Coord>(), Err(CoordParseError::Row('?')));
    }

    #[test]
    fn test_pair_parsing_strips_separators() {
        let expected = CoordPair::from_quad(0, 3, 1, 2);
        assert_eq!("A3 B2".parse::<CoordPair>().unwrap(), expected);
        assert_eq!(" a3,b2 ".parse::<CoordPair>().unwrap(), expected);
        assert_eq!("A3-B2".parse::<CoordPair>().unwrap(), expected);
        assert_eq!(expected.to_string(), "A3 B2");
        assert!("A3B".parse::<CoordPair>().is_err());
        assert!("A3B21".parse::<CoordPair>().is_err());
    }

    #[test]
    fn test_iter_range_covers_square() {
        let cells: Vec<Coord> = Coord::new(2, 2).iter_range(1).collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Coord::new(1, 1));
        assert_eq!(cells[8], Coord::new(3, 3));
    }

    #[test]
    fn test_rectangle_row_major() {
        let cells: Vec<Coord> = CoordPair::from_dim(3).iter_rectangle().collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[1], Coord::new(0, 1));
        assert_eq!(cells[3], Coord::new(1, 0));
    }

    #[test]
    fn test_mod_health_removes_and_flips_ai_flag() {
        let mut board = Board::new(5);
        let c = Coord::new(2, 2);
        board.place(c, Unit::new(Player::Defender, UnitType::AI));
        assert!(board.has_ai(Player::Defender));
        assert!(!board.has_ai(Player::Attacker));

        board.mod_health(c, -4);
        assert_eq!(board.get(c).map(|u| u.health), Some(5));
        board.mod_health(c, -40);
        assert!(board.is_empty(c));
        assert!(!board.has_ai(Player::Defender));

        // Nothing left to remove.
        board.mod_health(c, -1);
        assert!(!board.has_ai(Player::Defender));
    }

    #[test]
    fn test_default_layout() {
        let board = Board::with_default_layout(5);
        assert_eq!(board.units().count(), 12);
        assert_eq!(board.player_units(Player::Attacker).count(), 6);
        assert!(board.has_ai(Player::Attacker) && board.has_ai(Player::Defender));
        assert_eq!(
            board.get(Coord::new(3, 3)).map(|u| u.kind),
            Some(UnitType::Firewall)
        );
        assert_eq!(
            board.get(Coord::new(1, 1)).map(|u| (u.player, u.kind)),
            Some((Player::Defender, UnitType::Program))
        );
    }

    #[test]
    fn test_render_grid() {
        let board = Board::with_default_layout(5);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "    0   1   2   3   4  ");
        assert_eq!(lines[1], "A: dA9 dT9 dF9  .   .  ");
        assert_eq!(lines[5], "E:  .   .  aP9 aV9 aA9 ");
    }
}
