//! The per-round orchestrator: maintenance, dice, movement, square actions.

use crate::domain::{Card, CardEffect, EntityId, SquareKind};

use super::Game;

/// How a call to [`Game::play`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// One player (or none) was left standing.
    Completed { winner: Option<EntityId> },
    /// The turn budget ran out with the game still going.
    BudgetExhausted,
}

impl Game {
    /// Run rounds until a single player survives or the budget is spent.
    pub fn play(&mut self, turn_budget: u32) -> PlayOutcome {
        if self.completed {
            tracing::info!("game is already complete");
            return PlayOutcome::Completed {
                winner: self.active_players().first().copied(),
            };
        }

        for _ in 0..turn_budget {
            self.turn += 1;
            tracing::info!(turn = self.turn, "turn begins");

            let roster = self.player_ids.clone();
            for player in roster {
                if !self.entities[player.0].in_game {
                    tracing::debug!(player = %self.entities[player.0].name, "sitting out");
                    continue;
                }
                self.take_turn(player);
            }

            let survivors = self.active_players();
            if survivors.len() <= 1 {
                self.completed = true;
                let winner = survivors.first().copied();
                if let Some(winner) = winner {
                    tracing::info!(
                        winner = %self.entities[winner.0].name,
                        balance = %self.balance(winner),
                        properties = self.entities[winner.0].owned.len(),
                        "won the game"
                    );
                }
                return PlayOutcome::Completed { winner };
            }
        }

        PlayOutcome::BudgetExhausted
    }

    /// One player's full turn, repeating in place on doubles.
    fn take_turn(&mut self, player: EntityId) {
        loop {
            if !self.entities[player.0].in_game {
                break;
            }
            tracing::debug!(
                player = %self.entities[player.0].name,
                square = %self.board[self.entities[player.0].position].name,
                balance = %self.balance(player),
                "go begins"
            );

            self.maintenance(player);

            if self.entities[player.0].in_jail && self.entities[player.0].jail_free_cards > 0 {
                let behavior = self.entities[player.0].behavior;
                behavior.policy().consider_using_jail_card(self, player);
            }

            let (total, is_double) = self.roll_dice();
            self.last_roll = total;

            if self.entities[player.0].in_jail {
                if is_double {
                    tracing::info!(
                        player = %self.entities[player.0].name,
                        "out of jail on a double"
                    );
                    self.release_from_jail(player);
                } else {
                    self.entities[player.0].turns_in_jail += 1;
                    if self.entities[player.0].turns_in_jail >= self.max_turns_in_jail {
                        tracing::info!(
                            player = %self.entities[player.0].name,
                            "out of jail after paying the fine"
                        );
                        self.release_from_jail(player);
                        let pot = self.pot;
                        let fine = self.jail_fine;
                        self.transfer(player, pot, fine, "jail release fine");
                        if !self.entities[player.0].in_game {
                            break;
                        }
                    } else {
                        tracing::debug!(
                            player = %self.entities[player.0].name,
                            turns = self.entities[player.0].turns_in_jail,
                            "still in jail"
                        );
                        break;
                    }
                }
            }

            let landed = self.advance(player, total);
            self.resolve_square(player, landed);

            if !is_double || !self.entities[player.0].in_game {
                break;
            }
            tracing::debug!(player = %self.entities[player.0].name, "rolled a double, goes again");
        }
    }

    /// Pre-roll housekeeping: unmortgage and development decisions per owned
    /// property, then trade proposals.
    fn maintenance(&mut self, player: EntityId) {
        let owned = self.entities[player.0].owned.clone();
        for id in owned {
            if !self.entities[player.0].in_game {
                return;
            }
            let behavior = self.entities[player.0].behavior;
            let state = self.properties[id.0].clone();
            if state.mortgaged {
                if self.balance(player) > self.property_cost(id) {
                    behavior.policy().consider_unmortgage(self, player, id);
                }
            } else if self.property_square(id).street_terms().is_some()
                && self.set_completely_owned(id)
                && state.hotels == 0
            {
                if state.houses < 4 {
                    behavior.policy().consider_house_purchase(self, player, id);
                } else {
                    behavior.policy().consider_hotel_purchase(self, player, id);
                }
            }
        }

        if !self.entities[player.0].owned.is_empty() {
            let behavior = self.entities[player.0].behavior;
            behavior.policy().consider_proposing_trade(self, player);
        }
    }

    /// Roll the configured dice. A double means identical values across more
    /// than one die.
    pub(crate) fn roll_dice(&mut self) -> (u32, bool) {
        let faces = self.die_size;
        let count = self.num_dice;
        let rolls: Vec<u32> = (0..count).map(|_| self.rng.uniform(1, faces)).collect();
        let total = rolls.iter().sum();
        let is_double = count > 1 && rolls.windows(2).all(|pair| pair[0] == pair[1]);
        tracing::debug!(?rolls, total, is_double, "rolled");
        (total, is_double)
    }

    /// Move forward, crediting the GO amount when the move crosses (or lands
    /// on) GO. Returns the landing square's board index.
    pub(crate) fn advance(&mut self, player: EntityId, steps: u32) -> usize {
        let len = self.board.len();
        if self.go_index.is_some() && steps as usize >= self.distance_to_go(player) {
            tracing::info!(player = %self.entities[player.0].name, "passed GO");
            let bank = self.bank;
            let go_amount = self.go_amount;
            self.transfer(bank, player, go_amount, "passing go");
        }
        let position = (self.entities[player.0].position + steps as usize) % len;
        self.entities[player.0].position = position;
        let name = self.board[position].name.clone();
        self.entities[player.0].history.push(name);
        position
    }

    /// Move backwards. Never crosses GO for payment purposes.
    pub(crate) fn move_back(&mut self, player: EntityId, steps: u32) -> usize {
        let len = self.board.len();
        let position =
            (self.entities[player.0].position + len - (steps as usize % len)) % len;
        self.entities[player.0].position = position;
        let name = self.board[position].name.clone();
        self.entities[player.0].history.push(name);
        position
    }

    pub(crate) fn square_index(&self, name: &str) -> Option<usize> {
        self.board.iter().position(|s| s.name == name)
    }

    /// Teleport to the Jail square and set the jail flags. No GO credit.
    pub(crate) fn send_to_jail(&mut self, player: EntityId) {
        let Some(jail) = self.jail_index else {
            return;
        };
        tracing::info!(player = %self.entities[player.0].name, "sent to jail");
        let entity = &mut self.entities[player.0];
        entity.position = jail;
        entity.in_jail = true;
        entity.turns_in_jail = 0;
        let name = self.board[jail].name.clone();
        self.entities[player.0].history.push(name);
    }

    pub(crate) fn release_from_jail(&mut self, player: EntityId) {
        let entity = &mut self.entities[player.0];
        entity.in_jail = false;
        entity.turns_in_jail = 0;
    }

    /// Spend a jail-free card to leave jail, if one is held and applicable.
    pub fn use_jail_card(&mut self, player: EntityId) -> bool {
        let entity = &mut self.entities[player.0];
        if entity.in_jail && entity.jail_free_cards > 0 {
            entity.jail_free_cards -= 1;
            entity.in_jail = false;
            entity.turns_in_jail = 0;
            tracing::info!(player = %entity.name, "used a jail-free card");
            true
        } else {
            false
        }
    }

    /// Interpret the landed square.
    pub(crate) fn resolve_square(&mut self, player: EntityId, index: usize) {
        let kind = self.board[index].kind.clone();
        match kind {
            SquareKind::Go | SquareKind::Jail => {}
            SquareKind::Tax { amount } => {
                let bank = self.bank;
                let reason = self.board[index].name.to_lowercase();
                self.transfer(player, bank, amount, &reason);
            }
            SquareKind::FreeParking => {
                let pot = self.pot;
                let payout = self.balance(pot);
                if !payout.is_zero() {
                    tracing::info!(
                        player = %self.entities[player.0].name,
                        %payout,
                        "landed on free parking"
                    );
                    self.transfer(pot, player, payout, "free parking payout");
                }
            }
            SquareKind::GoToJail => {
                self.send_to_jail(player);
            }
            SquareKind::Chance => {
                if let Some(card) = self.chance.draw(self.rng.as_mut()) {
                    tracing::info!(
                        player = %self.entities[player.0].name,
                        card = %card.name,
                        "drew a chance"
                    );
                    self.apply_card(player, &card);
                }
            }
            SquareKind::CommunityChest => {
                if let Some(card) = self.community_chest.draw(self.rng.as_mut()) {
                    tracing::info!(
                        player = %self.entities[player.0].name,
                        card = %card.name,
                        "drew a community chest"
                    );
                    self.apply_card(player, &card);
                }
            }
            SquareKind::Street { .. } | SquareKind::Station { .. } | SquareKind::Utility { .. } => {
                let Some(id) = self.square_property[index] else {
                    return;
                };
                match self.properties[id.0].owner {
                    Some(owner) if owner != player => {
                        if self.entities[owner.0].in_game && !self.properties[id.0].mortgaged {
                            let rent = self.rent_due(id);
                            let reason = format!("rent on {}", self.board[index].name);
                            tracing::info!(
                                player = %self.entities[player.0].name,
                                owner = %self.entities[owner.0].name,
                                %rent,
                                property = %self.board[index].name,
                                "due rent"
                            );
                            self.transfer(player, owner, rent, &reason);
                        }
                    }
                    Some(_) => {}
                    None => {
                        if self.balance(player) >= self.property_cost(id) {
                            let behavior = self.entities[player.0].behavior;
                            behavior.policy().consider_purchase(self, player, id);
                        }
                    }
                }
            }
        }
    }

    /// Apply a drawn card's effect. Card movement does not trigger the
    /// destination square's own action.
    pub(crate) fn apply_card(&mut self, player: EntityId, card: &Card) {
        match &card.effect {
            CardEffect::AdvanceTo(name) => {
                if let Some(target) = self.square_index(name) {
                    let len = self.board.len();
                    let steps = (target + len - self.entities[player.0].position) % len;
                    self.advance(player, steps as u32);
                }
            }
            CardEffect::GoBack(steps) => {
                self.move_back(player, *steps);
            }
            CardEffect::GoBackTo(name) => {
                if let Some(target) = self.square_index(name) {
                    let len = self.board.len();
                    let steps = (self.entities[player.0].position + len - target) % len;
                    self.move_back(player, steps as u32);
                }
            }
            CardEffect::ReceiveFromBank(amount) => {
                let bank = self.bank;
                self.transfer(bank, player, *amount, &card.name);
            }
            CardEffect::PayBank(amount) => {
                let bank = self.bank;
                self.transfer(player, bank, *amount, &card.name);
            }
            CardEffect::PayPot(amount) => {
                let pot = self.pot;
                self.transfer(player, pot, *amount, &card.name);
            }
            CardEffect::Repairs {
                per_house,
                per_hotel,
            } => {
                let amount = *per_house * self.houses_owned_by(player) as i64
                    + *per_hotel * self.hotels_owned_by(player) as i64;
                let pot = self.pot;
                self.transfer(player, pot, amount, &card.name);
            }
            CardEffect::CollectFromEachPlayer(amount) => {
                for other in self.player_ids.clone() {
                    if other != player && self.entities[other.0].in_game {
                        self.transfer(other, player, *amount, &card.name);
                    }
                }
            }
            CardEffect::JailFree => {
                self.entities[player.0].jail_free_cards += 1;
            }
            CardEffect::GoToJail => {
                self.send_to_jail(player);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameConfig, PlayerSpec, Players};
    use crate::domain::{BoardLayout, Money, PurchaseTerms, Square};
    use crate::rng::StdRandomizer;

    fn layout() -> BoardLayout {
        BoardLayout {
            squares: vec![
                Square::new("GO", SquareKind::Go),
                Square::new(
                    "Income Tax",
                    SquareKind::Tax {
                        amount: Money(200),
                    },
                ),
                Square::new("Jail", SquareKind::Jail),
                Square::new("Free Parking", SquareKind::FreeParking),
                Square::new(
                    "North Station",
                    SquareKind::Station {
                        terms: PurchaseTerms {
                            value: Money(200),
                            mortgage_value: Money(100),
                        },
                    },
                ),
                Square::new("Go to Jail", SquareKind::GoToJail),
            ],
            chance: Vec::new(),
            community_chest: Vec::new(),
        }
    }

    fn passive_game() -> Game {
        let mut config = GameConfig::default();
        config.players = Players::Roster(vec![
            PlayerSpec::new("Ada").with_behavior(crate::behavior::BehaviorKind::Passive),
            PlayerSpec::new("Ben").with_behavior(crate::behavior::BehaviorKind::Passive),
        ]);
        Game::new(config, layout(), Box::new(StdRandomizer::seeded(4))).unwrap()
    }

    #[test]
    fn test_advance_wraps_and_pays_go() {
        let mut game = passive_game();
        let ada = game.players()[0];
        game.entity_mut(ada).position = 4;

        let landed = game.advance(ada, 3);
        assert_eq!(landed, 1);
        assert_eq!(game.balance(ada), Money(1700));
        assert_eq!(game.entity(ada).history.last().map(String::as_str), Some("Income Tax"));
    }

    #[test]
    fn test_advance_without_crossing_go_pays_nothing() {
        let mut game = passive_game();
        let ada = game.players()[0];
        game.advance(ada, 3);
        assert_eq!(game.balance(ada), Money(1500));
    }

    #[test]
    fn test_tax_square_pays_the_bank() {
        let mut game = passive_game();
        let ada = game.players()[0];
        let bank_before = game.balance(game.bank());
        game.resolve_square(ada, 1);
        assert_eq!(game.balance(ada), Money(1300));
        assert_eq!(game.balance(game.bank()), bank_before + Money(200));
    }

    #[test]
    fn test_free_parking_pays_out_and_resets() {
        let mut game = passive_game();
        let ada = game.players()[0];
        let pot = game.free_parking_pot();
        game.entity_mut(pot).account.credit(Money(365));

        game.resolve_square(ada, 3);
        assert_eq!(game.balance(ada), Money(1865));
        assert_eq!(game.balance(pot), Money::ZERO);
    }

    #[test]
    fn test_go_to_jail_square_jails_without_go_credit() {
        let mut game = passive_game();
        let ada = game.players()[0];
        game.entity_mut(ada).position = 5;

        game.resolve_square(ada, 5);
        let entity = game.entity(ada);
        assert!(entity.in_jail);
        assert_eq!(entity.position, 2);
        assert_eq!(game.balance(ada), Money(1500));
    }

    #[test]
    fn test_jail_card_consumed_only_in_jail() {
        let mut game = passive_game();
        let ada = game.players()[0];
        game.entity_mut(ada).jail_free_cards = 1;

        assert!(!game.use_jail_card(ada));
        game.send_to_jail(ada);
        assert!(game.use_jail_card(ada));
        let entity = game.entity(ada);
        assert!(!entity.in_jail);
        assert_eq!(entity.jail_free_cards, 0);
    }

    #[test]
    fn test_repairs_card_charges_per_building() {
        let mut game = passive_game();
        let ada = game.players()[0];
        let pot = game.free_parking_pot();
        let card = Card::new(
            "General repairs",
            CardEffect::Repairs {
                per_house: Money(25),
                per_hotel: Money(100),
            },
        );

        // No buildings: nothing to pay.
        game.apply_card(ada, &card);
        assert_eq!(game.balance(ada), Money(1500));
        assert_eq!(game.balance(pot), Money::ZERO);
    }

    #[test]
    fn test_collect_from_each_player_card() {
        let mut game = passive_game();
        let [ada, ben] = [game.players()[0], game.players()[1]];
        let card = Card::new("Birthday", CardEffect::CollectFromEachPlayer(Money(10)));

        game.apply_card(ada, &card);
        assert_eq!(game.balance(ada), Money(1510));
        assert_eq!(game.balance(ben), Money(1490));
    }

    #[test]
    fn test_play_completes_when_one_player_survives() {
        let mut game = passive_game();
        let ben = game.players()[1];
        game.entity_mut(ben).in_game = false;

        match game.play(10) {
            PlayOutcome::Completed { winner } => assert_eq!(winner, Some(game.players()[0])),
            other => panic!("Expected completion, got {:?}", other),
        }
        assert!(game.is_completed());
    }

    #[test]
    fn test_play_budget_exhaustion_leaves_game_open() {
        let mut game = passive_game();
        assert_eq!(game.play(3), PlayOutcome::BudgetExhausted);
        assert!(!game.is_completed());
        assert_eq!(game.turn(), 3);
    }
}
