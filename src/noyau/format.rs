// src/noyau/format.rs
//
// Affichage du résultat :
// 1) valeur binaire exacte -> `decimales` chiffres après la virgule
//    (arrondi au plus proche, égalité => chiffre pair)
// 2) retrait des zéros de queue, puis du point s’il reste seul
//    12.340000 -> 12.34 ; 30.000000 -> 30
//
// Pas de « -0 » : une valeur qui s’arrondit à zéro s’affiche « 0 ».

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use super::flottant::Flottant;
use super::reglages::{Reglages, DECIMALES_MAX};

/* ------------------------ Décimal (scaled -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    // n <= DECIMALES_MAX (voir formater_decimales)
    let n = u32::try_from(n.min(DECIMALES_MAX)).unwrap_or(0);
    BigInt::from(10).pow(n)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal à `digits` chiffres.
pub fn scaled_to_decimal(mut scaled: BigInt, digits: usize) -> String {
    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    if digits == 0 {
        return if neg {
            format!("-{int_part}")
        } else {
            format!("{int_part}")
        };
    }

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{int_part}.{frac}")
    } else {
        format!("{int_part}.{frac}")
    }
}

/// r -> entier “scalé” = arrondi_pair(r * 10^digits)
fn rational_scaled(r: &BigRational, digits: usize) -> BigInt {
    let scaled = r * BigRational::from_integer(pow10(digits));
    let plancher = scaled.floor();
    let reste = &scaled - &plancher; // dans [0, 1)
    let demi = BigRational::new(BigInt::from(1), BigInt::from(2));

    let mut n = plancher.to_integer();
    let monter = match reste.cmp(&demi) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => !(&n % 2u32).is_zero(),
    };
    if monter {
        n += 1u32;
    }
    n
}

/* ------------------------ Compactage ------------------------ */

/// Retire les zéros de queue puis un point final éventuel.
/// Idempotent : un texte déjà minimal (ex: "42") revient inchangé.
pub fn compacter(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/* ------------------------ API ------------------------ */

/// Texte à `decimales` chiffres après la virgule (au plus DECIMALES_MAX), puis compacté.
pub fn formater_decimales(x: &Flottant, decimales: usize) -> String {
    let decimales = decimales.min(DECIMALES_MAX);
    let scaled = rational_scaled(&x.en_rationnel(), decimales);
    compacter(&scaled_to_decimal(scaled, decimales))
}

/// Texte du résultat selon les réglages (6 décimales par défaut).
pub fn formater(x: &Flottant, reglages: &Reglages) -> String {
    formater_decimales(x, reglages.decimales())
}
