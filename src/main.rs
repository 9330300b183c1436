use anyhow::Context;

use tycoon::{
    BoardLayout, Card, CardEffect, ColourSet, Game, GameConfig, Money, PlayOutcome, PurchaseTerms,
    Square, SquareKind, StdRandomizer, StreetTerms,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = GameConfig::from_env().context("loading configuration")?;

    let seed = std::env::var("SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok());
    let rng = match seed {
        Some(seed) => Box::new(StdRandomizer::seeded(seed)),
        None => Box::new(StdRandomizer::from_entropy()),
    };

    let turn_budget = std::env::var("TURN_BUDGET")
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(200);

    let mut game = Game::new(config, demo_layout(), rng).context("building the game")?;

    match game.play(turn_budget) {
        PlayOutcome::Completed { winner } => {
            let name = winner
                .map(|id| game.entity(id).name.clone())
                .unwrap_or_else(|| "nobody".to_string());
            tracing::info!(winner = %name, turns = game.turn(), "game over");
        }
        PlayOutcome::BudgetExhausted => {
            tracing::info!(turns = game.turn(), "turn budget exhausted");
        }
    }

    let snapshot = game.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    tracing::info!(
        transactions = game.ledger().real().len(),
        "audit trail recorded"
    );
    Ok(())
}

fn street(
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

fn station(name: &str) -> Square {
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

fn utility(name: &str) -> Square {
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

/// A compact demonstration board. A real host supplies its own layout and
/// card decks at construction.
fn demo_layout() -> BoardLayout {
    let squares = vec![
        Square::new("GO", SquareKind::Go),
        street("Old Brewery Lane", "brown", 60, 30, 50, [2, 10, 30, 90, 160, 250]),
        Square::new("Community Chest", SquareKind::CommunityChest),
        street("Tannery Row", "brown", 60, 30, 50, [4, 20, 60, 180, 320, 450]),
        Square::new("Income Tax", SquareKind::Tax { amount: Money(200) }),
        station("North Station"),
        street("Mill Road", "cyan", 100, 50, 50, [6, 30, 90, 270, 400, 550]),
        Square::new("Chance", SquareKind::Chance),
        street("Weaver's Walk", "cyan", 100, 50, 50, [6, 30, 90, 270, 400, 550]),
        street("Dyers Yard", "cyan", 120, 60, 50, [8, 40, 100, 300, 450, 600]),
        Square::new("Jail", SquareKind::Jail),
        street("Foundry Street", "orange", 180, 90, 100, [14, 70, 200, 550, 750, 950]),
        utility("Electric Company"),
        street("Market Place", "orange", 200, 100, 100, [16, 80, 220, 600, 800, 1000]),
        station("South Station"),
        Square::new("Free Parking", SquareKind::FreeParking),
        street("Cathedral Close", "red", 220, 110, 150, [18, 90, 250, 700, 875, 1050]),
        Square::new("Community Chest", SquareKind::CommunityChest),
        street("Abbey Gardens", "red", 240, 120, 150, [20, 100, 300, 750, 925, 1100]),
        utility("Water Works"),
        Square::new("Go to Jail", SquareKind::GoToJail),
        street("Castle Hill", "green", 300, 150, 200, [26, 130, 390, 900, 1100, 1275]),
        Square::new("Super Tax", SquareKind::Tax { amount: Money(100) }),
        street("King's Parade", "green", 320, 160, 200, [28, 150, 450, 1000, 1200, 1400]),
    ];

    let chance = vec![
        Card::new("Advance to GO", CardEffect::AdvanceTo("GO".to_string())),
        Card::new("Go back three spaces", CardEffect::GoBack(3)),
        Card::new(
            "Take a trip to North Station",
            CardEffect::AdvanceTo("North Station".to_string()),
        ),
        Card::new("Speeding fine", CardEffect::PayPot(Money(15))),
        Card::new("Pay school fees", CardEffect::PayPot(Money(150))),
        Card::new("Bank pays you a dividend", CardEffect::ReceiveFromBank(Money(50))),
        Card::new("Your building loan matures", CardEffect::ReceiveFromBank(Money(150))),
        Card::new(
            "Make general repairs on all of your houses",
            CardEffect::Repairs {
                per_house: Money(25),
                per_hotel: Money(100),
            },
        ),
        Card::new("Get out of jail free", CardEffect::JailFree),
        Card::new("Go to jail", CardEffect::GoToJail),
    ];

    let community_chest = vec![
        Card::new("Advance to GO", CardEffect::AdvanceTo("GO".to_string())),
        Card::new(
            "Go back to Old Brewery Lane",
            CardEffect::GoBackTo("Old Brewery Lane".to_string()),
        ),
        Card::new("Bank error in your favour", CardEffect::ReceiveFromBank(Money(200))),
        Card::new("Doctor's fee", CardEffect::PayBank(Money(50))),
        Card::new("It is your birthday", CardEffect::CollectFromEachPlayer(Money(10))),
        Card::new("Pay hospital fees", CardEffect::PayBank(Money(100))),
        Card::new("Income tax refund", CardEffect::ReceiveFromBank(Money(20))),
        Card::new("You inherit a small fortune", CardEffect::ReceiveFromBank(Money(100))),
        Card::new("Get out of jail free", CardEffect::JailFree),
        Card::new("Go to jail", CardEffect::GoToJail),
    ];

    BoardLayout {
        squares,
        chance,
        community_chest,
    }
}
