//! Settlement scenarios: liquidation ordering, partial payment, bankruptcy.

mod common;

use common::{passive_roster, scripted_game, total_money};
use tycoon::Money;

/// A debtor with a built-up set raises rent money by selling the hotel, then
/// houses one at a time, then mortgaging, cheapest mortgage value first.
#[test]
fn test_liquidation_covers_rent_in_canonical_order() {
    let mut game = scripted_game(5000, passive_roster(&["Ada", "Ben"]), vec![]);
    let [ada, ben] = [game.players()[0], game.players()[1]];
    let bank = game.bank();

    let brown_a = game.property_at(1).unwrap();
    let brown_b = game.property_at(2).unwrap();
    let station_one = game.property_at(4).unwrap();

    game.buy_property(ada, brown_a).unwrap();
    game.buy_property(ada, brown_b).unwrap();
    game.buy_property(ada, station_one).unwrap();
    game.add_houses(brown_a, 4).unwrap();
    game.add_houses(brown_b, 2).unwrap();
    game.add_hotel(brown_a).unwrap();

    // Drain Ada down to 50, then charge 200 rent.
    let spare = game.balance(ada) - Money(50);
    game.transfer(ada, bank, spare, "setup drain");
    assert_eq!(game.balance(ada), Money(50));

    let before = total_money(&game);
    let paid_in_full = game.transfer(ada, ben, Money(200), "rent on Orange A");
    assert!(paid_in_full);

    // Hotel sold (25), four devolved houses sold one at a time (4 x 25),
    // then Brown A mortgaged, stripping Brown B's houses along the way.
    assert_eq!(game.property(brown_a).hotels, 0);
    assert_eq!(game.property(brown_a).houses, 0);
    assert!(game.property(brown_a).mortgaged);
    assert_eq!(game.property(brown_b).houses, 0);
    assert!(!game.property(brown_b).mortgaged);
    // The station was never needed.
    assert!(!game.property(station_one).mortgaged);

    // 50 + 25 + 100 + 50 (Brown B houses) + 30 (mortgage) = 255, minus 200.
    assert_eq!(game.balance(ada), Money(55));
    assert!(game.entity(ada).in_game);

    // Development is all back in the pool, money conserved.
    assert_eq!(game.pool().houses, 48);
    assert_eq!(game.pool().hotels, 12);
    assert_eq!(total_money(&game), before);
}

/// When liquidation cannot cover the debt, the payment settles partially and
/// the debtor's remaining portfolio transfers to the creditor.
#[test]
fn test_partial_payment_then_bankruptcy_transfers_portfolio() {
    let mut game = scripted_game(1500, passive_roster(&["Ada", "Ben"]), vec![]);
    let [ada, ben] = [game.players()[0], game.players()[1]];
    let bank = game.bank();

    let brown_a = game.property_at(1).unwrap();
    let station_one = game.property_at(4).unwrap();
    game.buy_property(ada, brown_a).unwrap();
    game.buy_property(ada, station_one).unwrap();

    let spare = game.balance(ada) - Money(50);
    game.transfer(ada, bank, spare, "setup drain");

    let before = total_money(&game);
    let paid_in_full = game.transfer(ada, ben, Money(500), "rent on Green B");
    assert!(!paid_in_full);

    // Liquidation mortgaged everything (30 + 100), still short of 500:
    // 50 + 130 = 180 went over as a partial payment.
    let record = game.ledger().real().last().unwrap();
    assert_eq!(record.requested, Money(500));
    assert_eq!(record.paid, Money(180));
    assert!(record.is_partial());

    assert!(!game.entity(ada).in_game);
    assert_eq!(game.balance(ada), Money::ZERO);
    assert_eq!(game.balance(ben), Money(1500 + 180));

    // Ben inherits the portfolio, mortgage state intact.
    assert_eq!(game.property(brown_a).owner, Some(ben));
    assert_eq!(game.property(station_one).owner, Some(ben));
    assert!(game.property(brown_a).mortgaged);
    assert!(game.entity(ada).owned.is_empty());

    assert_eq!(total_money(&game), before);
}

/// Every settlement pays at most what was requested, and at most the payer's
/// whole balance.
#[test]
fn test_paid_never_exceeds_requested() {
    let mut game = scripted_game(300, passive_roster(&["Ada", "Ben"]), vec![]);
    let [ada, ben] = [game.players()[0], game.players()[1]];

    game.transfer(ada, ben, Money(100), "small debt");
    game.transfer(ada, ben, Money(100000), "impossible debt");

    for record in game.ledger().real() {
        assert!(record.paid <= record.requested);
        assert!(!record.paid.is_negative());
    }
}

/// The bank pays what it has and is never eliminated; the shortfall simply
/// never materialises.
#[test]
fn test_bank_exhaustion_destroys_no_third_party_money() {
    let mut game = scripted_game(1500, passive_roster(&["Ada", "Ben"]), vec![]);
    let ada = game.players()[0];
    let bank = game.bank();

    let bank_before = game.balance(bank);
    let paid_in_full = game.transfer(bank, ada, bank_before + Money(1000), "jackpot");
    assert!(!paid_in_full);
    assert_eq!(game.balance(bank), Money::ZERO);
    assert_eq!(game.balance(ada), Money(1500) + bank_before);
    assert!(game.entity(bank).in_game);
}
