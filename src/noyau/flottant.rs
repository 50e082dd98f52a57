// src/noyau/flottant.rs
//
// Flottant binaire à précision fixe.
// valeur = ±mantisse × 2^exposant   (mantisse: BigUint, exposant: i64)
//
// Invariants :
// - zéro n’a pas de signe (negatif = false, exposant = 0)
// - mantisse non nulle => impaire (les zéros de queue passent dans l’exposant)
// - chaque opération calcule le résultat exact puis l’arrondit UNE fois,
//   selon le Contexte reçu (aucune précision globale)

use std::cmp::Ordering;

use num_bigint::{BigInt, BigUint, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Borne de l’exposant binaire : garde sommet() = exposant + bits loin de i64::MAX.
const EXPOSANT_LIMITE: i64 = 1 << 60;

/// Borne de l’exposant décimal accepté en lecture (ex: "1e-200").
const EXPOSANT_DECIMAL_MAX: i64 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arrondi {
    /// Troncature : on jette l’excédent sans jamais grossir la magnitude.
    VersZero,
    /// Au plus proche, égalité parfaite => dernier bit pair.
    PlusProchePair,
}

/// Précision (bits de mantisse) + mode d’arrondi, passés à chaque opération.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contexte {
    pub precision: u64,
    pub arrondi: Arrondi,
}

impl Contexte {
    pub const fn new(precision: u64, arrondi: Arrondi) -> Self {
        Self {
            precision,
            arrondi,
        }
    }

    pub fn avec_arrondi(self, arrondi: Arrondi) -> Self {
        Self { arrondi, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ErreurFlottant {
    #[error("division by zero")]
    DivisionParZero,
    #[error("numeric overflow")]
    Debordement,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flottant {
    negatif: bool,
    mantisse: BigUint,
    exposant: i64,
}

/* ------------------------ Arrondi (cœur) ------------------------ */

/// Arrondit ±mag × 2^exposant à `ctx.precision` bits.
/// `collant` = il reste des bits non nuls sous `mag` (quotient inexact).
/// Quand `collant` est vrai, l’appelant garantit au moins precision+2 bits.
fn arrondir(
    negatif: bool,
    mag: BigUint,
    exposant: i64,
    collant: bool,
    ctx: Contexte,
) -> Result<Flottant, ErreurFlottant> {
    if mag.is_zero() {
        return Ok(Flottant::zero());
    }

    let bits = mag.bits();
    debug_assert!(!collant || bits >= ctx.precision + 2);

    if bits <= ctx.precision {
        return Flottant::normalise(negatif, mag, exposant);
    }

    let decalage = bits - ctx.precision;
    let masque = (BigUint::one() << decalage) - 1u32;
    let reste = &mag & &masque;
    let mut garde = mag >> decalage;

    let monter = match ctx.arrondi {
        Arrondi::VersZero => false,
        Arrondi::PlusProchePair => {
            let moitie = BigUint::one() << (decalage - 1);
            match reste.cmp(&moitie) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => collant || est_impair(&garde),
            }
        }
    };
    if monter {
        // 0b111..1 + 1 => puissance de 2 : normalise() la replie dans l’exposant
        garde += 1u32;
    }

    let decalage = i64::try_from(decalage).map_err(|_| ErreurFlottant::Debordement)?;
    let exposant = exposant
        .checked_add(decalage)
        .ok_or(ErreurFlottant::Debordement)?;
    Flottant::normalise(negatif, garde, exposant)
}

fn est_impair(n: &BigUint) -> bool {
    !(n % 2u32).is_zero()
}

/// 10^n ; n est borné par EXPOSANT_DECIMAL_MAX + longueur du texte lu.
fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

/// Quotient num/den (magnitudes) arrondi, avec au moins precision+2 bits avant arrondi.
fn diviser_magnitudes(
    negatif: bool,
    num: &BigUint,
    den: &BigUint,
    exposant: i64,
    ctx: Contexte,
) -> Result<Flottant, ErreurFlottant> {
    let cible = ctx.precision + 2 + den.bits();
    let decalage = cible.saturating_sub(num.bits());

    let dividende = num << decalage;
    let quotient = &dividende / den;
    let reste = &dividende % den;

    let decalage = i64::try_from(decalage).map_err(|_| ErreurFlottant::Debordement)?;
    let exposant = exposant
        .checked_sub(decalage)
        .ok_or(ErreurFlottant::Debordement)?;
    arrondir(negatif, quotient, exposant, !reste.is_zero(), ctx)
}

/* ------------------------ Flottant ------------------------ */

impl Flottant {
    pub fn zero() -> Self {
        Self {
            negatif: false,
            mantisse: BigUint::zero(),
            exposant: 0,
        }
    }

    fn normalise(negatif: bool, mantisse: BigUint, exposant: i64) -> Result<Self, ErreurFlottant> {
        let zeros = match mantisse.trailing_zeros() {
            Some(z) => z,
            None => return Ok(Self::zero()),
        };
        let mantisse = mantisse >> zeros;
        let exposant = i64::try_from(zeros)
            .ok()
            .and_then(|z| exposant.checked_add(z))
            .filter(|e| e.abs() <= EXPOSANT_LIMITE)
            .ok_or(ErreurFlottant::Debordement)?;

        Ok(Self {
            negatif,
            mantisse,
            exposant,
        })
    }

    pub fn depuis_entier(n: i64, ctx: Contexte) -> Self {
        let mag = BigUint::from(n.unsigned_abs());
        // |n| < 2^64 : l’exposant reste petit, pas de débordement possible
        arrondir(n < 0, mag, 0, false, ctx).unwrap_or_else(|_| Self::zero())
    }

    pub fn depuis_rationnel(r: &BigRational, ctx: Contexte) -> Result<Self, ErreurFlottant> {
        let negatif = r.is_negative();
        let num = r.numer().magnitude();
        let den = r.denom().magnitude();

        if den.is_one() {
            return arrondir(negatif, num.clone(), 0, false, ctx);
        }
        diviser_magnitudes(negatif, num, den, 0, ctx)
    }

    /// Lecture d’un texte décimal : `[+-]? chiffres [. chiffres]? ([eE][+-]?chiffres)?`
    /// None si le texte n’est pas un nombre (ou si l’exposant décimal est hors bornes).
    pub fn depuis_decimal(texte: &str, ctx: Contexte) -> Option<Self> {
        let r = lire_decimal(texte)?;
        Self::depuis_rationnel(&r, ctx).ok()
    }

    /// Ré-arrondit une valeur existante dans un autre contexte.
    pub fn arrondi(&self, ctx: Contexte) -> Result<Self, ErreurFlottant> {
        arrondir(self.negatif, self.mantisse.clone(), self.exposant, false, ctx)
    }

    /* ------------------------ Signe ------------------------ */

    pub fn est_zero(&self) -> bool {
        self.mantisse.is_zero()
    }

    pub fn est_negatif(&self) -> bool {
        self.negatif
    }

    pub fn est_entier(&self) -> bool {
        self.est_zero() || self.exposant >= 0
    }

    pub fn neg(&self) -> Self {
        if self.est_zero() {
            return Self::zero();
        }
        Self {
            negatif: !self.negatif,
            ..self.clone()
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            negatif: false,
            ..self.clone()
        }
    }

    /// Position juste au-dessus du bit de poids fort (ordre binaire ; 0 pour zéro).
    pub fn sommet(&self) -> i64 {
        self.exposant + self.mantisse.bits() as i64
    }

    /// Entier exact tenant dans un i64 ; None sinon.
    pub fn vers_i64(&self) -> Option<i64> {
        if !self.est_entier() || self.exposant > 63 {
            return None;
        }
        let mag = &self.mantisse << (self.exposant as u64);
        let signe = if self.negatif { Sign::Minus } else { Sign::Plus };
        BigInt::from_biguint(signe, mag).to_i64()
    }

    /// Valeur exacte (toujours représentable : dénominateur = 2^k).
    pub fn en_rationnel(&self) -> BigRational {
        let signe = if self.negatif { Sign::Minus } else { Sign::Plus };
        if self.est_zero() {
            return BigRational::zero();
        }
        if self.exposant >= 0 {
            let n = BigInt::from_biguint(signe, &self.mantisse << (self.exposant as u64));
            return BigRational::from_integer(n);
        }
        // mantisse impaire => fraction déjà réduite
        let num = BigInt::from_biguint(signe, self.mantisse.clone());
        let den = BigInt::one() << (self.exposant.unsigned_abs());
        BigRational::new_raw(num, den)
    }

    /* ------------------------ Opérations ------------------------ */

    pub fn ajouter(&self, autre: &Self, ctx: Contexte) -> Result<Self, ErreurFlottant> {
        if self.est_zero() {
            return autre.arrondi(ctx);
        }
        if autre.est_zero() {
            return self.arrondi(ctx);
        }

        let (a, b) = if self.sommet() >= autre.sommet() {
            (self.clone(), replier(self, autre, ctx.precision))
        } else {
            (replier(autre, self, ctx.precision), autre.clone())
        };

        let base = a.exposant.min(b.exposant);
        let signe = |f: &Flottant| {
            let mag = &f.mantisse << ((f.exposant - base) as u64);
            BigInt::from_biguint(if f.negatif { Sign::Minus } else { Sign::Plus }, mag)
        };
        let somme = signe(&a) + signe(&b);

        let negatif = somme.sign() == Sign::Minus;
        arrondir(negatif, somme.magnitude().clone(), base, false, ctx)
    }

    pub fn soustraire(&self, autre: &Self, ctx: Contexte) -> Result<Self, ErreurFlottant> {
        self.ajouter(&autre.neg(), ctx)
    }

    pub fn multiplier(&self, autre: &Self, ctx: Contexte) -> Result<Self, ErreurFlottant> {
        if self.est_zero() || autre.est_zero() {
            return Ok(Self::zero());
        }
        let exposant = self
            .exposant
            .checked_add(autre.exposant)
            .ok_or(ErreurFlottant::Debordement)?;
        let mag = &self.mantisse * &autre.mantisse;
        arrondir(self.negatif != autre.negatif, mag, exposant, false, ctx)
    }

    pub fn diviser(&self, autre: &Self, ctx: Contexte) -> Result<Self, ErreurFlottant> {
        if autre.est_zero() {
            return Err(ErreurFlottant::DivisionParZero);
        }
        if self.est_zero() {
            return Ok(Self::zero());
        }
        let exposant = self
            .exposant
            .checked_sub(autre.exposant)
            .ok_or(ErreurFlottant::Debordement)?;
        diviser_magnitudes(
            self.negatif != autre.negatif,
            &self.mantisse,
            &autre.mantisse,
            exposant,
            ctx,
        )
    }

    /// x / 2, exact (seul l’exposant bouge).
    pub fn moitie(&self) -> Result<Self, ErreurFlottant> {
        if self.est_zero() {
            return Ok(Self::zero());
        }
        let exposant = self
            .exposant
            .checked_sub(1)
            .filter(|e| e.abs() <= EXPOSANT_LIMITE)
            .ok_or(ErreurFlottant::Debordement)?;
        Ok(Self {
            exposant,
            ..self.clone()
        })
    }
}

/// Si `petit` tombe entièrement sous la position d’arrondi de `grand`,
/// on le remplace par un unique bit collant de même signe, plus bas que tout bit de `grand`.
/// Le résultat arrondi est identique, sans décalage géant.
fn replier(grand: &Flottant, petit: &Flottant, precision: u64) -> Flottant {
    let seuil = grand.sommet() - precision as i64 - 3;
    if petit.sommet() >= seuil {
        return petit.clone();
    }
    Flottant {
        negatif: petit.negatif,
        mantisse: BigUint::one(),
        exposant: grand.exposant.min(seuil) - 1,
    }
}

fn comparer_magnitudes(a: &Flottant, b: &Flottant) -> Ordering {
    match a.sommet().cmp(&b.sommet()) {
        Ordering::Equal => {
            let base = a.exposant.min(b.exposant);
            let ma = &a.mantisse << ((a.exposant - base) as u64);
            let mb = &b.mantisse << ((b.exposant - base) as u64);
            ma.cmp(&mb)
        }
        autre => autre,
    }
}

impl Ord for Flottant {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rang(f: &Flottant) -> i8 {
            if f.est_zero() {
                0
            } else if f.negatif {
                -1
            } else {
                1
            }
        }

        match rang(self).cmp(&rang(other)) {
            Ordering::Equal if rang(self) == 0 => Ordering::Equal,
            Ordering::Equal if self.negatif => comparer_magnitudes(self, other).reverse(),
            Ordering::Equal => comparer_magnitudes(self, other),
            autre => autre,
        }
    }
}

impl PartialOrd for Flottant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/* ------------------------ Lecture décimale ------------------------ */

/// Texte décimal -> rationnel exact.
pub fn lire_decimal(texte: &str) -> Option<BigRational> {
    let (negatif, corps) = match texte.as_bytes().first() {
        Some(b'-') => (true, &texte[1..]),
        Some(b'+') => (false, &texte[1..]),
        _ => (false, texte),
    };

    let (chiffres_txt, exposant10) = match corps.find(|c| c == 'e' || c == 'E') {
        Some(i) => {
            let e_txt = &corps[i + 1..];
            let sans_signe = e_txt.strip_prefix(&['+', '-'][..]).unwrap_or(e_txt);
            if sans_signe.is_empty() || !sans_signe.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (&corps[..i], e_txt.parse::<i64>().ok()?)
        }
        None => (corps, 0),
    };
    if exposant10.abs() > EXPOSANT_DECIMAL_MAX {
        return None;
    }

    let (entiere, fraction) = chiffres_txt.split_once('.').unwrap_or((chiffres_txt, ""));
    if entiere.is_empty() && fraction.is_empty() {
        return None;
    }
    if !entiere.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }

    let chiffres = format!("{entiere}{fraction}");
    let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)?;
    let echelle = exposant10 - fraction.len() as i64;

    let puissance = u32::try_from(echelle.unsigned_abs()).ok()?;
    let r = if echelle >= 0 {
        BigRational::from_integer(n * pow10(puissance))
    } else {
        BigRational::new(n, pow10(puissance))
    };
    Some(if negatif { -r } else { r })
}
