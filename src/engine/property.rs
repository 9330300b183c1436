//! Property lifecycle: purchase, mortgage, development, rent.
//!
//! Refused operations log and return a [`RuleViolation`]; nothing here
//! panics or bankrupts. Settlement handles money trouble.

use crate::domain::{ColourSet, EntityId, Money, PropertyId, SquareKind};
use crate::error::RuleViolation;

use super::Game;

/// Rent by number of stations held by the owner.
const STATION_RENT: [i64; 4] = [25, 50, 100, 200];
/// Dice multipliers for one utility / the full pair.
const UTILITY_SINGLE_MULTIPLIER: i64 = 4;
const UTILITY_PAIR_MULTIPLIER: i64 = 10;

impl Game {
    /// Face value of a property.
    pub fn property_value(&self, id: PropertyId) -> Money {
        self.property_square(id)
            .purchase_terms()
            .map(|t| t.value)
            .unwrap_or(Money::ZERO)
    }

    pub fn mortgage_value(&self, id: PropertyId) -> Money {
        self.property_square(id)
            .purchase_terms()
            .map(|t| t.mortgage_value)
            .unwrap_or(Money::ZERO)
    }

    /// The cash needed to take the property on: face value, or face value
    /// plus a 10% premium while it is mortgaged.
    pub fn property_cost(&self, id: PropertyId) -> Money {
        let value = self.property_value(id);
        if self.properties[id.0].mortgaged {
            value.with_tenth_premium()
        } else {
            value
        }
    }

    /// The colour set of a street, if the property is one.
    pub fn colour_set(&self, id: PropertyId) -> Option<ColourSet> {
        self.property_square(id).street_terms().map(|t| t.set.clone())
    }

    /// Every street in the given colour set.
    pub fn set_members(&self, set: &ColourSet) -> Vec<PropertyId> {
        self.properties
            .iter()
            .enumerate()
            .filter(|(_, state)| {
                self.board[state.square]
                    .street_terms()
                    .map(|t| &t.set == set)
                    .unwrap_or(false)
            })
            .map(|(index, _)| PropertyId(index))
            .collect()
    }

    /// Whether the street's whole colour set is held unmortgaged by its
    /// owner, which enables development and doubles undeveloped rent.
    pub fn set_completely_owned(&self, id: PropertyId) -> bool {
        let Some(owner) = self.properties[id.0].owner else {
            return false;
        };
        let Some(set) = self.colour_set(id) else {
            return false;
        };
        self.set_members(&set).iter().all(|member| {
            let state = &self.properties[member.0];
            state.owner == Some(owner) && !state.mortgaged
        })
    }

    /// Whether the player holds every street of the set, mortgaged or not.
    pub fn owns_full_set(&self, player: EntityId, set: &ColourSet) -> bool {
        let members = self.set_members(set);
        !members.is_empty()
            && members
                .iter()
                .all(|member| self.properties[member.0].owner == Some(player))
    }

    /// Distinct colour sets the player holds completely, unmortgaged.
    pub fn completed_sets_of(&self, player: EntityId) -> Vec<ColourSet> {
        let mut sets = Vec::new();
        for id in &self.entities[player.0].owned {
            if let Some(set) = self.colour_set(*id) {
                if !sets.contains(&set) && self.set_completely_owned(*id) {
                    sets.push(set);
                }
            }
        }
        sets
    }

    /// Distinct colour sets completely owned by any player.
    pub fn completed_sets_in_play(&self) -> Vec<ColourSet> {
        let mut sets = Vec::new();
        for (index, _) in self.properties.iter().enumerate() {
            let id = PropertyId(index);
            if let Some(set) = self.colour_set(id) {
                if !sets.contains(&set) && self.set_completely_owned(id) {
                    sets.push(set);
                }
            }
        }
        sets
    }

    pub fn stations_owned_by(&self, player: EntityId) -> usize {
        self.entities[player.0]
            .owned
            .iter()
            .filter(|id| {
                matches!(
                    self.property_square(**id).kind,
                    SquareKind::Station { .. }
                )
            })
            .count()
    }

    pub fn utilities_owned_by(&self, player: EntityId) -> usize {
        self.entities[player.0]
            .owned
            .iter()
            .filter(|id| {
                matches!(
                    self.property_square(**id).kind,
                    SquareKind::Utility { .. }
                )
            })
            .count()
    }

    pub fn houses_owned_by(&self, player: EntityId) -> u32 {
        self.entities[player.0]
            .owned
            .iter()
            .map(|id| self.properties[id.0].houses as u32)
            .sum()
    }

    pub fn hotels_owned_by(&self, player: EntityId) -> u32 {
        self.entities[player.0]
            .owned
            .iter()
            .map(|id| self.properties[id.0].hotels as u32)
            .sum()
    }

    /// Rent due from a stranger landing on the property right now.
    ///
    /// The caller is responsible for the no-charge cases (mortgaged property,
    /// eliminated owner, the owner landing on their own square).
    pub fn rent_due(&self, id: PropertyId) -> Money {
        let state = &self.properties[id.0];
        let Some(owner) = state.owner else {
            return Money::ZERO;
        };

        match &self.board[state.square].kind {
            SquareKind::Street { street, .. } => {
                if self.set_completely_owned(id) {
                    if state.hotels == 1 {
                        street.rent[5]
                    } else if state.houses == 0 {
                        street.rent[0] * 2
                    } else {
                        street.rent[state.houses as usize]
                    }
                } else {
                    street.rent[0]
                }
            }
            SquareKind::Station { .. } => {
                let held = self.stations_owned_by(owner).clamp(1, STATION_RENT.len());
                Money(STATION_RENT[held - 1])
            }
            SquareKind::Utility { .. } => {
                let multiplier = if self.utilities_owned_by(owner) >= 2 {
                    UTILITY_PAIR_MULTIPLIER
                } else {
                    UTILITY_SINGLE_MULTIPLIER
                };
                Money(self.last_roll as i64 * multiplier)
            }
            _ => Money::ZERO,
        }
    }

    // --- transitions ---------------------------------------------------

    fn refused(&self, violation: RuleViolation) -> Result<(), RuleViolation> {
        tracing::warn!(%violation, "refused property operation");
        Err(violation)
    }

    /// Buy an unowned property from the bank at its current cost.
    pub fn buy_property(&mut self, buyer: EntityId, id: PropertyId) -> Result<(), RuleViolation> {
        if self.properties[id.0].owner.is_some() {
            return self.refused(RuleViolation::AlreadyOwned(self.property_name(id).to_string()));
        }
        let cost = self.property_cost(id);
        if self.balance(buyer) < cost {
            return self.refused(RuleViolation::InsufficientFunds {
                needed: cost,
                available: self.balance(buyer),
            });
        }

        let bank = self.bank;
        let reason = format!("purchase of {}", self.property_name(id));
        self.transfer(buyer, bank, cost, &reason);
        self.properties[id.0].owner = Some(buyer);
        self.entities[buyer.0].owned.push(id);
        tracing::info!(
            buyer = %self.entities[buyer.0].name,
            property = %self.property_name(id),
            %cost,
            "purchased"
        );
        Ok(())
    }

    /// Sell an owned property to another player at an agreed price, as the
    /// settlement of an accepted trade. Mortgage state travels with it.
    pub fn sell_property_between(
        &mut self,
        id: PropertyId,
        buyer: EntityId,
        amount: Money,
    ) -> Result<(), RuleViolation> {
        let Some(seller) = self.properties[id.0].owner else {
            return self.refused(RuleViolation::NotOwned(self.property_name(id).to_string()));
        };
        if self.balance(buyer) < amount {
            return self.refused(RuleViolation::InsufficientFunds {
                needed: amount,
                available: self.balance(buyer),
            });
        }

        let reason = format!("sale of {}", self.property_name(id));
        self.transfer(buyer, seller, amount, &reason);
        self.entities[seller.0].owned.retain(|p| *p != id);
        self.entities[buyer.0].owned.push(id);
        self.properties[id.0].owner = Some(buyer);
        tracing::info!(
            seller = %self.entities[seller.0].name,
            buyer = %self.entities[buyer.0].name,
            property = %self.property_name(id),
            %amount,
            "traded"
        );
        Ok(())
    }

    /// Mortgage a property for immediate cash. A set cannot stay partially
    /// developed around a mortgage, so development is sold off the whole
    /// colour set first.
    pub fn mortgage(&mut self, id: PropertyId) -> Result<(), RuleViolation> {
        let Some(owner) = self.properties[id.0].owner else {
            return self.refused(RuleViolation::NotOwned(self.property_name(id).to_string()));
        };
        if self.properties[id.0].mortgaged {
            return self.refused(RuleViolation::AlreadyMortgaged(
                self.property_name(id).to_string(),
            ));
        }

        if let Some(set) = self.colour_set(id) {
            for member in self.set_members(&set) {
                if self.properties[member.0].hotels == 1 {
                    self.sell_hotel(member)?;
                }
                let houses = self.properties[member.0].houses;
                if houses > 0 {
                    self.sell_houses(member, houses)?;
                }
            }
        }

        let value = self.mortgage_value(id);
        let bank = self.bank;
        let reason = format!("mortgage of {}", self.property_name(id));
        self.properties[id.0].mortgaged = true;
        self.transfer(bank, owner, value, &reason);
        tracing::info!(
            owner = %self.entities[owner.0].name,
            property = %self.property_name(id),
            %value,
            "mortgaged"
        );
        Ok(())
    }

    /// Unmortgage a property for 110% of its face value.
    pub fn unmortgage(&mut self, id: PropertyId) -> Result<(), RuleViolation> {
        let Some(owner) = self.properties[id.0].owner else {
            return self.refused(RuleViolation::NotOwned(self.property_name(id).to_string()));
        };
        if !self.properties[id.0].mortgaged {
            return self.refused(RuleViolation::NotMortgaged(
                self.property_name(id).to_string(),
            ));
        }
        let cost = self.property_cost(id);
        if self.balance(owner) <= cost {
            return self.refused(RuleViolation::InsufficientFunds {
                needed: cost,
                available: self.balance(owner),
            });
        }

        let bank = self.bank;
        let reason = format!("unmortgage of {}", self.property_name(id));
        self.transfer(owner, bank, cost, &reason);
        self.properties[id.0].mortgaged = false;
        tracing::info!(
            owner = %self.entities[owner.0].name,
            property = %self.property_name(id),
            %cost,
            "unmortgaged"
        );
        Ok(())
    }

    /// Buy houses from the pool onto a street.
    pub fn add_houses(&mut self, id: PropertyId, count: u8) -> Result<(), RuleViolation> {
        let name = self.property_name(id).to_string();
        let Some(street) = self.property_square(id).street_terms().cloned() else {
            return self.refused(RuleViolation::NotDevelopable(name));
        };
        let Some(owner) = self.properties[id.0].owner else {
            return self.refused(RuleViolation::NotOwned(name));
        };
        if !self.set_completely_owned(id) {
            return self.refused(RuleViolation::SetIncomplete(name));
        }
        if self.properties[id.0].hotels == 1 {
            return self.refused(RuleViolation::HotelAlreadyBuilt(name));
        }
        if self.properties[id.0].houses + count > 4 {
            return self.refused(RuleViolation::HouseCapExceeded(name));
        }
        if self.pool.houses < count {
            return self.refused(RuleViolation::PoolExhausted {
                kind: "house",
                available: self.pool.houses,
                requested: count,
            });
        }
        let cost = street.house_cost * count as i64;
        if self.balance(owner) < cost {
            return self.refused(RuleViolation::InsufficientFunds {
                needed: cost,
                available: self.balance(owner),
            });
        }

        let bank = self.bank;
        let reason = format!("housing purchase on {}", name);
        self.transfer(owner, bank, cost, &reason);
        self.pool.houses -= count;
        self.properties[id.0].houses += count;
        tracing::info!(
            owner = %self.entities[owner.0].name,
            property = %name,
            count,
            %cost,
            "bought houses"
        );
        Ok(())
    }

    /// Sell houses back to the pool at half price.
    pub fn sell_houses(&mut self, id: PropertyId, count: u8) -> Result<(), RuleViolation> {
        let name = self.property_name(id).to_string();
        let Some(street) = self.property_square(id).street_terms().cloned() else {
            return self.refused(RuleViolation::NotDevelopable(name));
        };
        let Some(owner) = self.properties[id.0].owner else {
            return self.refused(RuleViolation::NotOwned(name));
        };
        let present = self.properties[id.0].houses;
        if count > present {
            return self.refused(RuleViolation::NotEnoughHouses {
                name,
                requested: count,
                present,
            });
        }

        let refund = street.house_cost.halved() * count as i64;
        let bank = self.bank;
        let reason = format!("housing sale on {}", name);
        self.properties[id.0].houses -= count;
        self.pool.houses += count;
        self.transfer(bank, owner, refund, &reason);
        tracing::info!(
            owner = %self.entities[owner.0].name,
            property = %name,
            count,
            %refund,
            remaining = self.properties[id.0].houses,
            "sold houses"
        );
        Ok(())
    }

    /// Swap four houses for a hotel from the pool.
    pub fn add_hotel(&mut self, id: PropertyId) -> Result<(), RuleViolation> {
        let name = self.property_name(id).to_string();
        let Some(street) = self.property_square(id).street_terms().cloned() else {
            return self.refused(RuleViolation::NotDevelopable(name));
        };
        let Some(owner) = self.properties[id.0].owner else {
            return self.refused(RuleViolation::NotOwned(name));
        };
        if self.properties[id.0].hotels == 1 {
            return self.refused(RuleViolation::HotelAlreadyBuilt(name));
        }
        if self.properties[id.0].houses != 4 {
            return self.refused(RuleViolation::HotelRequiresFourHouses(name));
        }
        if self.pool.hotels < 1 {
            return self.refused(RuleViolation::PoolExhausted {
                kind: "hotel",
                available: self.pool.hotels,
                requested: 1,
            });
        }
        if self.balance(owner) < street.hotel_cost {
            return self.refused(RuleViolation::InsufficientFunds {
                needed: street.hotel_cost,
                available: self.balance(owner),
            });
        }

        let bank = self.bank;
        let reason = format!("hotel purchase on {}", name);
        self.transfer(owner, bank, street.hotel_cost, &reason);
        self.properties[id.0].houses = 0;
        self.properties[id.0].hotels = 1;
        self.pool.houses += 4;
        self.pool.hotels -= 1;
        tracing::info!(
            owner = %self.entities[owner.0].name,
            property = %name,
            cost = %street.hotel_cost,
            "bought hotel"
        );
        Ok(())
    }

    /// Sell a hotel back to the pool at half price, devolving to as many
    /// houses as the pool can supply (up to four).
    pub fn sell_hotel(&mut self, id: PropertyId) -> Result<(), RuleViolation> {
        let name = self.property_name(id).to_string();
        let Some(street) = self.property_square(id).street_terms().cloned() else {
            return self.refused(RuleViolation::NotDevelopable(name));
        };
        let Some(owner) = self.properties[id.0].owner else {
            return self.refused(RuleViolation::NotOwned(name));
        };
        if self.properties[id.0].hotels != 1 {
            return self.refused(RuleViolation::NoHotel(name));
        }

        let refund = street.hotel_cost.halved();
        let bank = self.bank;
        let reason = format!("hotel sale on {}", name);
        self.properties[id.0].hotels = 0;
        self.pool.hotels += 1;
        self.transfer(bank, owner, refund, &reason);

        let granted = self.pool.houses.min(4);
        self.pool.houses -= granted;
        self.properties[id.0].houses = granted;
        tracing::info!(
            owner = %self.entities[owner.0].name,
            property = %name,
            %refund,
            devolved_to = granted,
            "sold hotel"
        );
        Ok(())
    }
}
