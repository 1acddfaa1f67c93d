use minesweeper_solver::{Cell, Dimensions, Game, GameSetupBuilder, KnowledgeBase, Reveal};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Every conclusion and every stored sentence must agree with the real board.
fn assert_consistent_with(kb: &KnowledgeBase, game: &Game) {
  let setup = game.setup();
  assert!(kb.known_safe().is_disjoint(kb.known_mine()));
  for &cell in kb.known_mine() {
    assert!(setup.is_mine(cell), "{:?} deduced as mine", cell);
  }
  for &cell in kb.known_safe() {
    assert!(!setup.is_mine(cell), "{:?} deduced as safe", cell);
  }
  for sentence in kb.sentences() {
    assert!(!sentence.is_empty());
    assert!(sentence.count() as usize <= sentence.len());
    assert!(sentence.cells().is_disjoint(kb.known_safe()));
    assert!(sentence.cells().is_disjoint(kb.known_mine()));
    let actual = sentence.cells().iter().filter(|&&cell| setup.is_mine(cell)).count();
    assert_eq!(actual, sentence.count() as usize, "{:?} is not true", sentence);
  }
  if let Some(cell) = kb.safe_move() {
    assert!(!kb.is_move_made(cell));
    assert!(!kb.known_mine().contains(&cell));
    assert!(!setup.is_mine(cell));
  }
}

fn probe(kb: &mut KnowledgeBase, game: &mut Game, cell: Cell) {
  match game.open(cell).unwrap() {
    Reveal::Exploded => panic!("probed mine at {:?}", cell),
    Reveal::Opened(opened) => {
      for (cell, count) in opened {
        kb.observe(cell, count).unwrap();
      }
    }
  }
}

proptest! {
  #[test]
  fn deductions_match_the_board(
    height in 1u32..=7,
    width in 1u32..=7,
    density in 0.0f64..0.6,
    seed in any::<u64>(),
  ) {
    let dims = Dimensions::new(height, width);
    let mines = (f64::from(dims.area()) * density) as u32;
    let mut builder = GameSetupBuilder::new(dims).with_seed(seed);
    prop_assert!(builder.add_random_mines(mines));
    let mut game = Game::from(&builder);
    let mut kb = KnowledgeBase::new(dims);

    // Guesses come from an oracle that only offers safe cells.
    let mut guesses: Vec<Cell> = dims.cells().filter(|&cell| !game.setup().is_mine(cell)).collect();
    guesses.shuffle(&mut StdRng::seed_from_u64(seed));

    loop {
      let next = kb
        .safe_move()
        .or_else(|| guesses.iter().copied().find(|&cell| !kb.is_move_made(cell)));
      let Some(cell) = next else { break };
      probe(&mut kb, &mut game, cell);
      assert_consistent_with(&kb, &game);
    }

    prop_assert!(game.is_won());
  }

  #[test]
  fn repeated_observations_change_nothing(
    height in 2u32..=6,
    width in 2u32..=6,
    seed in any::<u64>(),
  ) {
    let dims = Dimensions::new(height, width);
    let mut builder = GameSetupBuilder::new(dims).with_seed(seed);
    prop_assert!(builder.add_random_mines(dims.area() / 4));
    let setup = builder.build();
    let mut kb = KnowledgeBase::new(dims);

    for cell in dims.cells().filter(|&cell| !setup.is_mine(cell)).take(4) {
      let count = setup.adjacent_mine_count(cell).unwrap();
      kb.observe(cell, count).unwrap();
      let safes = kb.known_safe().clone();
      let mines = kb.known_mine().clone();
      let again = kb.observe(cell, count).unwrap();
      prop_assert_eq!(kb.known_safe(), &safes);
      prop_assert_eq!(kb.known_mine(), &mines);
      prop_assert!(again.safes.is_empty() && again.mines.is_empty());
    }
  }
}

#[test]
fn zero_count_in_the_middle_clears_every_neighbour() {
  let dims = Dimensions::new(8, 8);
  let mut kb = KnowledgeBase::new(dims);
  kb.observe(Cell::new(3, 3), 0).unwrap();
  for neighbour in Cell::new(3, 3).neighbours() {
    assert!(kb.known_safe().contains(&neighbour));
  }
  assert!(kb.sentences().is_empty());
}
