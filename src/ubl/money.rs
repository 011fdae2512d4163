//! Arrondi monétaire.
//!
//! Arrondi commercial (demi vers le haut, loin de zéro) puis écriture en
//! virgule fixe : `100` devient `"100.00"`, `10.005` devient `"10.01"`.

use rust_decimal::{Decimal, RoundingStrategy};

/// Nombre de décimales des montants émis
pub const MONEY_DECIMALS: u32 = 2;

/// Arrondit à `decimals` chiffres et complète avec des zéros
pub fn round_fixed(value: Decimal, decimals: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded
}

/// Texte d'un montant à 2 décimales
pub fn money(value: Decimal) -> String {
    round_fixed(value, MONEY_DECIMALS).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_half_up() {
        assert_eq!(money(dec!(10.005)), "10.01");
        assert_eq!(money(dec!(3.8019)), "3.80");
        assert_eq!(money(dec!(0.125)), "0.13");
        assert_eq!(money(dec!(2.675)), "2.68");
        assert_eq!(money(dec!(-1.005)), "-1.01");
    }

    #[test]
    fn test_fixed_point_padding() {
        assert_eq!(money(dec!(100)), "100.00");
        assert_eq!(money(dec!(0)), "0.00");
        assert_eq!(money(dec!(20.010)), "20.01");
        assert_eq!(money(dec!(7.5)), "7.50");
    }

    #[test]
    fn test_other_precision() {
        assert_eq!(round_fixed(dec!(19), 2).to_string(), "19.00");
        assert_eq!(round_fixed(dec!(1.2345), 3).to_string(), "1.235");
        assert_eq!(round_fixed(dec!(1.5), 0).to_string(), "2");
    }
}
