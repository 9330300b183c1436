//! Behavior policies: how non-human players react at each decision point.
//!
//! A policy is a set of handlers, one per decision point. Handlers read the
//! game, weigh a [`Decision`] with personality-derived factors, and carry out
//! the resulting action themselves. Three policies exist: the heuristic
//! default, a passive one that never acts, and a simulation-safe one used
//! inside forecast clones so a simulated player can never spawn further
//! simulations.

use serde::{Deserialize, Serialize};

use crate::decision::Decision;
use crate::domain::{ColourSet, EntityId, Money, PropertyId, SquareKind};
use crate::engine::Game;
use crate::rng::Randomizer;

/// Scalar traits in `[0, 1]` a heuristic player's factors are derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub patience: f64,
    pub risk_taking: f64,
    pub hoarding: f64,
    pub stubbornness: f64,
    pub opportunism: f64,
}

impl Personality {
    /// Every trait at 0.5.
    pub fn balanced() -> Self {
        Personality {
            patience: 0.5,
            risk_taking: 0.5,
            hoarding: 0.5,
            stubbornness: 0.5,
            opportunism: 0.5,
        }
    }

    pub fn random(rng: &mut dyn Randomizer) -> Self {
        let mut trait_value = || rng.uniform(0, 100) as f64 / 100.0;
        Personality {
            patience: trait_value(),
            risk_taking: trait_value(),
            hoarding: trait_value(),
            stubbornness: trait_value(),
            opportunism: trait_value(),
        }
    }
}

/// Which policy an entity follows. Stored as a tag so game state stays plain
/// data; dispatch goes through [`BehaviorKind::policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorKind {
    Heuristic,
    Passive,
    Simulation,
}

impl BehaviorKind {
    pub fn policy(self) -> &'static dyn Behavior {
        match self {
            BehaviorKind::Heuristic => &HeuristicBehavior,
            BehaviorKind::Passive => &PassiveBehavior,
            BehaviorKind::Simulation => &SimulationBehavior,
        }
    }
}

/// One method per decision point. The default for every handler is to do
/// nothing, which is exactly the passive and simulation-safe policies.
pub trait Behavior {
    /// The player landed on an affordable unowned property.
    fn consider_purchase(&self, _game: &mut Game, _player: EntityId, _property: PropertyId) {}

    /// The player can afford to unmortgage this property.
    fn consider_unmortgage(&self, _game: &mut Game, _player: EntityId, _property: PropertyId) {}

    /// The street's set is complete and has room for houses.
    fn consider_house_purchase(&self, _game: &mut Game, _player: EntityId, _property: PropertyId) {}

    /// The street has four houses and could take a hotel.
    fn consider_hotel_purchase(&self, _game: &mut Game, _player: EntityId, _property: PropertyId) {}

    /// Raise cash towards `target` before a settlement resolves.
    fn liquidate(&self, _game: &mut Game, _player: EntityId, _target: Money) {}

    /// The player is in jail holding a jail-free card.
    fn consider_using_jail_card(&self, _game: &mut Game, _player: EntityId) {}

    /// Pre-roll opportunity to make offers on opponents' properties.
    fn consider_proposing_trade(&self, _game: &mut Game, _player: EntityId) {}

    /// Another player offered `offer` for this property. Returns acceptance.
    fn consider_proposed_trade(
        &self,
        _game: &mut Game,
        _owner: EntityId,
        _proposer: EntityId,
        _property: PropertyId,
        _offer: Money,
    ) -> bool {
        false
    }
}

/// Never acts. Useful as a baseline and for players sitting a game out; a
/// passive player still pays rent and taxes like anyone else.
pub struct PassiveBehavior;

impl Behavior for PassiveBehavior {}

/// The no-op policy installed on every entity inside a forecast clone, so a
/// simulated player can never trigger a further simulation.
pub struct SimulationBehavior;

impl Behavior for SimulationBehavior {}

/// The default risk/hoarding-weighted heuristics.
pub struct HeuristicBehavior;

impl HeuristicBehavior {
    /// How many set-mates the player and opponents hold for this property's
    /// grouping (colour set for streets, kind for stations and utilities).
    fn holdings(game: &Game, player: EntityId, property: PropertyId) -> (usize, usize) {
        match &game.property_square(property).kind {
            SquareKind::Street { street, .. } => {
                let set = street.set.clone();
                let of_set = |id: EntityId| {
                    game.entity(id)
                        .owned
                        .iter()
                        .filter(|p| game.colour_set(**p).as_ref() == Some(&set))
                        .count()
                };
                let mine = of_set(player);
                let others = game
                    .players()
                    .iter()
                    .filter(|p| **p != player)
                    .map(|p| of_set(*p))
                    .sum();
                (mine, others)
            }
            SquareKind::Station { .. } => {
                let mine = game.stations_owned_by(player);
                let others: usize = game
                    .players()
                    .iter()
                    .filter(|p| **p != player)
                    .map(|p| game.stations_owned_by(*p))
                    .sum();
                (mine, others)
            }
            SquareKind::Utility { .. } => {
                let mine = game.utilities_owned_by(player);
                let others: usize = game
                    .players()
                    .iter()
                    .filter(|p| **p != player)
                    .map(|p| game.utilities_owned_by(*p))
                    .sum();
                (mine, others)
            }
            _ => (0, 0),
        }
    }
}

impl Behavior for HeuristicBehavior {
    fn consider_purchase(&self, game: &mut Game, player: EntityId, property: PropertyId) {
        let value = game.property_value(property);
        let balance = game.balance(player);
        let personality = game.entity(player).personality;
        let exposure = game.forecast(player);

        let mut decision = Decision::new();
        // A likely expensive landing next turn tempers the appetite.
        if exposure.worst_cost() > balance - value {
            decision.add_factor(personality.risk_taking * 0.75);
        } else {
            decision.add_factor(personality.risk_taking);
        }

        let (mine, others) = Self::holdings(game, player, property);
        if mine > 0 {
            // Already invested in this grouping: always complete it.
            decision.force_yes();
        } else if others > 0 {
            decision.add_factor(personality.hoarding * 0.5);
        } else {
            decision.add_factor(personality.hoarding);
        }

        if game.decide(&mut decision) {
            let _ = game.buy_property(player, property);
        }
    }

    fn consider_unmortgage(&self, game: &mut Game, player: EntityId, property: PropertyId) {
        let cost = game.property_cost(property);
        let balance = game.balance(player);

        if let Some(set) = game.colour_set(property) {
            if game.owns_full_set(player, &set) {
                // Completing a set is always worth the premium.
                let _ = game.unmortgage(property);
                return;
            }
        }

        if cost.ratio_of(balance) < 0.15 {
            let exposure = game.forecast(player);
            if exposure.worst_cost() <= balance - cost {
                let _ = game.unmortgage(property);
            }
        }
    }

    fn consider_house_purchase(&self, game: &mut Game, player: EntityId, property: PropertyId) {
        let Some(street) = game.property_square(property).street_terms().cloned() else {
            return;
        };
        if street.house_cost <= Money::ZERO {
            return;
        }
        let balance = game.balance(player);
        let personality = game.entity(player).personality;
        let present = game.property(property).houses;

        // Spend at most 40% of cash on houses in any one turn.
        let affordable =
            ((balance.as_i64() as f64 * 0.4) / street.house_cost.as_i64() as f64).floor() as i64;
        let headroom = (4 - present) as i64;
        let to_buy = affordable.clamp(0, headroom) as u8;

        let mut decision = Decision::new();
        decision.outputs.houses_to_buy = Some(to_buy);

        let exposure = game.forecast(player);
        if exposure.worst_cost() > balance - street.house_cost {
            decision.add_factor(personality.risk_taking);
        }

        if to_buy > 0 && game.decide(&mut decision) {
            let _ = game.add_houses(property, to_buy);
        }
    }

    fn consider_hotel_purchase(&self, game: &mut Game, player: EntityId, property: PropertyId) {
        let Some(street) = game.property_square(property).street_terms().cloned() else {
            return;
        };
        let balance = game.balance(player);

        let mut decision = Decision::new();
        // A hotel costing over two thirds of cash is a step too far.
        if balance <= Money::ZERO || street.hotel_cost.ratio_of(balance) > 2.0 / 3.0 {
            decision.force_no();
        } else {
            decision.force_yes();
        }

        if game.decide(&mut decision) {
            let _ = game.add_hotel(property);
        }
    }

    /// Canonical sell-off: hotel, then houses one at a time, then mortgage,
    /// over the portfolio in ascending mortgage value, stopping as soon as
    /// the target is met.
    fn liquidate(&self, game: &mut Game, player: EntityId, target: Money) {
        tracing::info!(
            player = %game.entity(player).name,
            %target,
            balance = %game.balance(player),
            "raising cash"
        );

        let mut portfolio = game.entity(player).owned.clone();
        portfolio.sort_by_key(|id| game.mortgage_value(*id));

        for id in portfolio {
            if game.balance(player) >= target {
                break;
            }
            if game.property(id).hotels == 1 {
                let _ = game.sell_hotel(id);
            }
            while game.property(id).houses > 0 && game.balance(player) < target {
                let _ = game.sell_houses(id, 1);
            }
            if game.balance(player) >= target {
                break;
            }
            if !game.property(id).mortgaged {
                let _ = game.mortgage(id);
            }
        }
    }

    fn consider_using_jail_card(&self, game: &mut Game, player: EntityId) {
        // Stay put only while most of the developed board belongs to others.
        let total = game.completed_sets_in_play().len();
        let mine = game.completed_sets_of(player).len();
        if total == 0 || mine * 2 >= total {
            game.use_jail_card(player);
        }
    }

    fn consider_proposing_trade(&self, game: &mut Game, player: EntityId) {
        tracing::debug!(player = %game.entity(player).name, "considering trades");

        let invested: Vec<ColourSet> = {
            let mut sets = Vec::new();
            for id in &game.entity(player).owned {
                if let Some(set) = game.colour_set(*id) {
                    if !sets.contains(&set) {
                        sets.push(set);
                    }
                }
            }
            sets
        };

        for opponent in game.players().to_vec() {
            if opponent == player || !game.entity(opponent).in_game {
                continue;
            }
            for id in game.entity(opponent).owned.clone() {
                let Some(set) = game.colour_set(id) else {
                    continue;
                };
                if !invested.contains(&set) {
                    continue;
                }

                let members = game.set_members(&set).len();
                let held_by_owner = game
                    .entity(opponent)
                    .owned
                    .iter()
                    .filter(|p| game.colour_set(**p).as_ref() == Some(&set))
                    .count();

                let mut decision = Decision::new();
                // The closer the owner is to completing the set, the more it
                // is worth prying loose.
                decision.add_factor((held_by_owner as f64 + 1.0) / members as f64);
                decision.add_factor(game.balance(player).as_i64() as f64 / 1000.0);
                decision.add_factor(
                    1.0 - game.distance_to_go(player) as f64 / game.board().len() as f64,
                );

                if game.decide(&mut decision) {
                    let offer = Money(
                        (game.balance(player).as_i64() as f64 * decision.probability()) as i64,
                    );
                    decision.outputs.offer = Some(offer);
                    if offer > game.property_cost(id) && game.balance(player) >= offer {
                        tracing::info!(
                            player = %game.entity(player).name,
                            property = %game.property_name(id),
                            owner = %game.entity(opponent).name,
                            %offer,
                            "placing offer"
                        );
                        let owner_behavior = game.entity(opponent).behavior;
                        let accepted = owner_behavior.policy().consider_proposed_trade(
                            game, opponent, player, id, offer,
                        );
                        if accepted {
                            let _ = game.sell_property_between(id, player, offer);
                        }
                    }
                }
            }
        }
    }

    fn consider_proposed_trade(
        &self,
        game: &mut Game,
        owner: EntityId,
        proposer: EntityId,
        property: PropertyId,
        offer: Money,
    ) -> bool {
        tracing::info!(
            owner = %game.entity(owner).name,
            proposer = %game.entity(proposer).name,
            property = %game.property_name(property),
            %offer,
            "considering offer"
        );

        let mut decision = Decision::new();
        // The longer the game has run, the readier the seller.
        decision.add_factor(game.turn().min(100) as f64 / 100.0);
        // A fat premium over list price helps.
        decision.add_factor(1.0 - game.property_cost(property).ratio_of(offer));
        // Being cash-poor helps too.
        decision.add_factor(1.0 - game.balance(owner).as_i64() as f64 / 1000.0);

        game.decide(&mut decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, PlayerSpec, Players};
    use crate::domain::{BoardLayout, PurchaseTerms, Square, StreetTerms};
    use crate::rng::StdRandomizer;

    fn street(name: &str, set: &str, value: i64, mortgage: i64, house_cost: i64) -> Square {
        Square::new(
            name,
            SquareKind::Street {
                terms: PurchaseTerms {
                    value: Money(value),
                    mortgage_value: Money(mortgage),
                },
                street: StreetTerms {
                    rent: [
                        Money(10),
                        Money(50),
                        Money(150),
                        Money(450),
                        Money(625),
                        Money(750),
                    ],
                    house_cost: Money(house_cost),
                    hotel_cost: Money(house_cost),
                    set: ColourSet::new(set),
                },
            },
        )
    }

    fn layout() -> BoardLayout {
        BoardLayout {
            squares: vec![
                Square::new("GO", SquareKind::Go),
                street("Cheap Row", "brown", 60, 30, 50),
                street("Dear Street", "brown", 80, 40, 50),
                street("Uptown One", "green", 300, 150, 200),
                street("Uptown Two", "green", 320, 160, 200),
                Square::new("Jail", SquareKind::Jail),
            ],
            chance: Vec::new(),
            community_chest: Vec::new(),
        }
    }

    fn game() -> Game {
        let mut config = GameConfig::default();
        config.starting_balance = Money(5000);
        config.players = Players::Roster(vec![
            PlayerSpec::new("Ada"),
            PlayerSpec::new("Ben").with_behavior(BehaviorKind::Passive),
        ]);
        Game::new(config, layout(), Box::new(StdRandomizer::seeded(8))).unwrap()
    }

    #[test]
    fn test_personality_random_stays_in_unit_range() {
        let mut rng = StdRandomizer::seeded(13);
        for _ in 0..20 {
            let p = Personality::random(&mut rng);
            for value in [
                p.patience,
                p.risk_taking,
                p.hoarding,
                p.stubbornness,
                p.opportunism,
            ] {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_passive_policy_never_buys() {
        let mut game = game();
        let ben = game.players()[1];
        let cheap = game.property_at(1).unwrap();

        BehaviorKind::Passive
            .policy()
            .consider_purchase(&mut game, ben, cheap);
        assert_eq!(game.property(cheap).owner, None);
        assert_eq!(game.balance(ben), Money(5000));
    }

    #[test]
    fn test_simulation_policy_rejects_trades() {
        let mut game = game();
        let [ada, ben] = [game.players()[0], game.players()[1]];
        let cheap = game.property_at(1).unwrap();
        game.buy_property(ada, cheap).unwrap();

        let accepted = BehaviorKind::Simulation.policy().consider_proposed_trade(
            &mut game,
            ada,
            ben,
            cheap,
            Money(500),
        );
        assert!(!accepted);
        assert_eq!(game.property(cheap).owner, Some(ada));
    }

    #[test]
    fn test_heuristic_completes_an_invested_set() {
        let mut game = game();
        let ada = game.players()[0];
        let cheap = game.property_at(1).unwrap();
        let dear = game.property_at(2).unwrap();
        game.buy_property(ada, cheap).unwrap();

        // Owning one of the set forces the purchase regardless of the draw.
        BehaviorKind::Heuristic
            .policy()
            .consider_purchase(&mut game, ada, dear);
        assert_eq!(game.property(dear).owner, Some(ada));
    }

    #[test]
    fn test_heuristic_unmortgages_to_complete_a_set() {
        let mut game = game();
        let ada = game.players()[0];
        let cheap = game.property_at(1).unwrap();
        let dear = game.property_at(2).unwrap();
        game.buy_property(ada, cheap).unwrap();
        game.buy_property(ada, dear).unwrap();
        game.mortgage(dear).unwrap();

        BehaviorKind::Heuristic
            .policy()
            .consider_unmortgage(&mut game, ada, dear);
        assert!(!game.property(dear).mortgaged);
    }

    #[test]
    fn test_hotel_purchase_declined_when_too_dear() {
        let mut game = game();
        let ada = game.players()[0];
        let cheap = game.property_at(1).unwrap();
        let dear = game.property_at(2).unwrap();
        game.buy_property(ada, cheap).unwrap();
        game.buy_property(ada, dear).unwrap();
        game.add_houses(cheap, 4).unwrap();

        // Leave just enough that the hotel costs more than 2/3 of cash.
        let balance = game.balance(ada);
        game.entity_mut(ada).account.debit(balance - Money(60));

        BehaviorKind::Heuristic
            .policy()
            .consider_hotel_purchase(&mut game, ada, cheap);
        assert_eq!(game.property(cheap).hotels, 0);
    }

    #[test]
    fn test_liquidation_order_hotel_houses_mortgage_cheapest_first() {
        let mut game = game();
        let ada = game.players()[0];
        let cheap = game.property_at(1).unwrap();
        let dear = game.property_at(2).unwrap();
        game.buy_property(ada, cheap).unwrap();
        game.buy_property(ada, dear).unwrap();
        game.add_houses(cheap, 4).unwrap();
        game.add_houses(dear, 4).unwrap();
        game.add_hotel(cheap).unwrap();

        // Down to nothing, then raise a modest target: the hotel on the
        // cheapest property goes first and should cover it alone.
        let balance = game.balance(ada);
        game.entity_mut(ada).account.debit(balance);
        BehaviorKind::Heuristic
            .policy()
            .liquidate(&mut game, ada, Money(20));

        assert_eq!(game.property(cheap).hotels, 0);
        assert!(game.balance(ada) >= Money(20));
        // The dearer street keeps its development.
        assert_eq!(game.property(dear).houses, 4);
        assert!(!game.property(dear).mortgaged);
    }

    #[test]
    fn test_liquidation_mortgages_when_development_is_not_enough() {
        let mut game = game();
        let ada = game.players()[0];
        let cheap = game.property_at(1).unwrap();
        let dear = game.property_at(2).unwrap();
        game.buy_property(ada, cheap).unwrap();
        game.buy_property(ada, dear).unwrap();

        let balance = game.balance(ada);
        game.entity_mut(ada).account.debit(balance);
        BehaviorKind::Heuristic
            .policy()
            .liquidate(&mut game, ada, Money(60));

        // No development to sell: both undeveloped streets get mortgaged,
        // cheapest mortgage value first.
        assert!(game.property(cheap).mortgaged);
        assert!(game.property(dear).mortgaged);
        assert_eq!(game.balance(ada), Money(70));
    }

    #[test]
    fn test_jail_card_held_back_when_outgunned() {
        let mut game = game();
        let [ada, ben] = [game.players()[0], game.players()[1]];

        // Ben holds the only completed set in play.
        let one = game.property_at(3).unwrap();
        let two = game.property_at(4).unwrap();
        game.buy_property(ben, one).unwrap();
        game.buy_property(ben, two).unwrap();

        game.send_to_jail(ada);
        game.entity_mut(ada).jail_free_cards = 1;
        BehaviorKind::Heuristic
            .policy()
            .consider_using_jail_card(&mut game, ada);
        assert!(game.entity(ada).in_jail);
        assert_eq!(game.entity(ada).jail_free_cards, 1);
    }

    #[test]
    fn test_jail_card_used_when_board_is_open() {
        let mut game = game();
        let ada = game.players()[0];
        game.send_to_jail(ada);
        game.entity_mut(ada).jail_free_cards = 1;

        BehaviorKind::Heuristic
            .policy()
            .consider_using_jail_card(&mut game, ada);
        assert!(!game.entity(ada).in_jail);
        assert_eq!(game.entity(ada).jail_free_cards, 0);
    }
}
