//! Shared fixtures: a standard test board and a scripted dice source.
#![allow(dead_code)]

use tycoon::{
    BehaviorKind, BoardLayout, ColourSet, Game, GameConfig, Money, Personality, PlayerSpec,
    Players, PurchaseTerms, Randomizer, Square, SquareKind, StreetTerms,
};

/// Returns scripted faces in order; once exhausted, always the low bound.
pub struct ScriptedDice {
    faces: Vec<u32>,
    next: usize,
}

impl ScriptedDice {
    pub fn new(faces: Vec<u32>) -> Self {
        ScriptedDice { faces, next: 0 }
    }
}

impl Randomizer for ScriptedDice {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        let value = self.faces.get(self.next).copied().unwrap_or(lo);
        self.next += 1;
        value.clamp(lo, hi)
    }
}

pub fn street(
    name: &str,
    set: &str,
    value: i64,
    mortgage: i64,
    house_cost: i64,
    rent: [i64; 6],
) -> Square {
    Square::new(
        name,
        SquareKind::Street {
            terms: PurchaseTerms {
                value: Money(value),
                mortgage_value: Money(mortgage),
            },
            street: StreetTerms {
                rent: rent.map(Money),
                house_cost: Money(house_cost),
                hotel_cost: Money(house_cost),
                set: ColourSet::new(set),
            },
        },
    )
}

pub fn station(name: &str) -> Square {
    Square::new(
        name,
        SquareKind::Station {
            terms: PurchaseTerms {
                value: Money(200),
                mortgage_value: Money(100),
            },
        },
    )
}

pub fn utility(name: &str) -> Square {
    Square::new(
        name,
        SquareKind::Utility {
            terms: PurchaseTerms {
                value: Money(150),
                mortgage_value: Money(75),
            },
        },
    )
}

/// Twenty squares: two-street sets, four stations, two utilities, both tax
/// squares, jail machinery and free parking. No card squares, so scripted
/// dice are the only randomness consumed during play.
pub fn test_layout() -> BoardLayout {
    BoardLayout {
        squares: vec![
            Square::new("GO", SquareKind::Go),
            street("Brown A", "brown", 60, 30, 50, [2, 10, 30, 90, 160, 250]),
            street("Brown B", "brown", 60, 30, 50, [4, 20, 60, 180, 320, 450]),
            Square::new("Income Tax", SquareKind::Tax { amount: Money(200) }),
            station("Station One"),
            street("Cyan A", "cyan", 100, 50, 50, [6, 30, 90, 270, 400, 550]),
            street("Cyan B", "cyan", 120, 60, 50, [8, 40, 100, 300, 450, 600]),
            Square::new("Jail", SquareKind::Jail),
            utility("Utility One"),
            street("Orange A", "orange", 180, 90, 100, [14, 70, 200, 550, 750, 950]),
            street("Orange B", "orange", 200, 100, 100, [16, 80, 220, 600, 800, 1000]),
            station("Station Two"),
            Square::new("Free Parking", SquareKind::FreeParking),
            utility("Utility Two"),
            street("Green A", "green", 300, 150, 200, [26, 130, 390, 900, 1100, 1275]),
            street("Green B", "green", 320, 160, 200, [28, 150, 450, 1000, 1200, 1400]),
            station("Station Three"),
            Square::new("Super Tax", SquareKind::Tax { amount: Money(100) }),
            station("Station Four"),
            Square::new("Go to Jail", SquareKind::GoToJail),
        ],
        chance: Vec::new(),
        community_chest: Vec::new(),
    }
}

/// A roster of passive players with fixed personalities, so no randomness is
/// consumed outside dice rolls.
pub fn passive_roster(names: &[&str]) -> Players {
    Players::Roster(
        names
            .iter()
            .map(|name| {
                PlayerSpec::new(*name)
                    .with_behavior(BehaviorKind::Passive)
                    .with_personality(Personality::balanced())
            })
            .collect(),
    )
}

pub fn scripted_game(starting_balance: i64, roster: Players, faces: Vec<u32>) -> Game {
    let mut config = GameConfig::default();
    config.starting_balance = Money(starting_balance);
    config.players = roster;
    Game::new(config, test_layout(), Box::new(ScriptedDice::new(faces))).unwrap()
}

/// Total currency across every account, bank and pot included.
pub fn total_money(game: &Game) -> Money {
    let mut total = game.balance(game.bank()) + game.balance(game.free_parking_pot());
    for player in game.players() {
        total += game.balance(*player);
    }
    total
}

/// Houses and hotels standing on the board.
pub fn buildings_on_board(game: &Game) -> (u32, u32) {
    let mut houses = 0;
    let mut hotels = 0;
    for player in game.players() {
        houses += game.houses_owned_by(*player);
        hotels += game.hotels_owned_by(*player);
    }
    (houses, hotels)
}
