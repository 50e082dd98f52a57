// src/noyau/primitives.rs
//
// Primitives arithmétiques pures sur Flottant.
// - même entrée + même contexte => même sortie (aucun état partagé)
// - chaque primitive renvoie Result : aucune voie de panique depuis l’entrée utilisateur
// - bornes explicites (Reglages) : exposant, factorielle, itérations de Newton

use super::erreur::{ErreurCalcul, ErreurDomaine};
use super::flottant::{Contexte, Flottant};
use super::reglages::Reglages;

/// Primitives liées à un contexte (précision + arrondi) et aux bornes des réglages.
#[derive(Clone, Copy, Debug)]
pub struct Primitives<'r> {
    ctx: Contexte,
    reglages: &'r Reglages,
}

impl<'r> Primitives<'r> {
    /// Chemin expression : arrondi des réglages (au plus proche pair par défaut).
    pub fn expression(reglages: &'r Reglages) -> Self {
        Self {
            ctx: reglages.contexte(),
            reglages,
        }
    }

    /// Chemin structuré {num1, num2, operator} : intermédiaires tronqués.
    pub fn structure(reglages: &'r Reglages) -> Self {
        Self {
            ctx: reglages.contexte_structure(),
            reglages,
        }
    }

    /// Lexème / texte décimal -> Flottant à la précision courante.
    pub fn nombre(&self, texte: &str) -> Option<Flottant> {
        Flottant::depuis_decimal(texte, self.ctx)
    }

    pub fn un(&self) -> Flottant {
        Flottant::depuis_entier(1, self.ctx)
    }

    /* ------------------------ + - * / ------------------------ */

    pub fn ajouter(&self, a: &Flottant, b: &Flottant) -> Result<Flottant, ErreurCalcul> {
        Ok(a.ajouter(b, self.ctx)?)
    }

    pub fn soustraire(&self, a: &Flottant, b: &Flottant) -> Result<Flottant, ErreurCalcul> {
        Ok(a.soustraire(b, self.ctx)?)
    }

    pub fn multiplier(&self, a: &Flottant, b: &Flottant) -> Result<Flottant, ErreurCalcul> {
        Ok(a.multiplier(b, self.ctx)?)
    }

    /// Diviseur exactement nul => `division by zero`.
    pub fn diviser(&self, a: &Flottant, b: &Flottant) -> Result<Flottant, ErreurCalcul> {
        Ok(a.diviser(b, self.ctx)?)
    }

    /* ------------------------ Puissance entière ------------------------ */

    /// base^n, n entier (|n| <= exposant_max).
    /// Exponentiation rapide ; n < 0 => 1 / base^|n|.
    pub fn puissance(&self, base: &Flottant, exposant: &Flottant) -> Result<Flottant, ErreurCalcul> {
        if !exposant.est_entier() {
            return Err(ErreurDomaine::ExposantNonEntier.into());
        }
        let n = exposant
            .vers_i64()
            .filter(|n| n.unsigned_abs() <= self.reglages.exposant_max())
            .ok_or(ErreurDomaine::ExposantTropGrand)?;

        let mut e = n.unsigned_abs();
        let mut acc = self.un();
        let mut b = base.arrondi(self.ctx)?;

        while e > 0 {
            if (e & 1) == 1 {
                acc = acc.multiplier(&b, self.ctx)?;
            }
            e >>= 1;
            if e > 0 {
                b = b.multiplier(&b, self.ctx)?;
            }
        }

        if n < 0 {
            // 0^-n => division par zéro
            return self.diviser(&self.un(), &acc);
        }
        Ok(acc)
    }

    /* ------------------------ Factorielle ------------------------ */

    /// n! pour n entier, 0 <= n <= factorielle_max.
    pub fn factorielle(&self, n: &Flottant) -> Result<Flottant, ErreurCalcul> {
        if n.est_negatif() {
            return Err(ErreurDomaine::FactorielleNegative.into());
        }
        if !n.est_entier() {
            return Err(ErreurDomaine::FactorielleNonEntiere.into());
        }

        let borne = self.reglages.factorielle_max();
        let entier = n.vers_i64();
        let k = entier
            .map(|k| k.unsigned_abs())
            .filter(|k| *k <= borne)
            .ok_or(ErreurDomaine::FactorielleTropGrande(entier))?;

        let mut acc = self.un();
        for j in 2..=k {
            let facteur = Flottant::depuis_entier(j as i64, self.ctx);
            acc = acc.multiplier(&facteur, self.ctx)?;
        }
        Ok(acc)
    }

    /* ------------------------ Racine carrée (Newton) ------------------------ */

    /// √v par Newton : g <- (g + v/g) / 2, départ v/2,
    /// arrêt quand |g' - g| < tolérance.
    ///
    /// À précision finie, l’itération peut osciller entre deux voisins
    /// (écart d’une unité de dernier rang, au-dessus de la tolérance) : on s’arrête aussi
    /// dès qu’une valeur revient.
    ///
    /// Depuis v/2, chaque pas divise l’écart à √v par deux environ tant que g ≫ √v :
    /// il faut ~|ordre(v)|/2 pas avant la phase quadratique. Le plafond des réglages
    /// s’ajoute à cette phase, il ne la borne pas.
    pub fn racine_carree(&self, v: &Flottant) -> Result<Flottant, ErreurCalcul> {
        if v.est_negatif() {
            return Err(ErreurDomaine::RacineNegativeStructuree.into());
        }
        if v.est_zero() {
            return Ok(Flottant::zero());
        }

        let v = v.arrondi(self.ctx)?;
        let tolerance = self.reglages.tolerance_racine();

        let plafond = plafond_newton(&v, self.reglages.iterations_racine_max(), self.ctx);

        let mut g = v.moitie()?;
        let mut precedent: Option<Flottant> = None;

        for i in 0..plafond {
            let quotient = v.diviser(&g, self.ctx)?;
            let suivant = g.ajouter(&quotient, self.ctx)?.moitie()?;
            let ecart = suivant.soustraire(&g, self.ctx)?.abs();

            if ecart < *tolerance {
                log::trace!("racine: tolérance atteinte après {} itérations", i + 1);
                return Ok(suivant);
            }
            if precedent.as_ref() == Some(&suivant) {
                log::trace!("racine: cycle de période 2 après {} itérations", i + 1);
                return Ok(suivant.min(g));
            }

            precedent = Some(std::mem::replace(&mut g, suivant));
        }

        log::warn!("racine: plafond de {plafond} itérations atteint");
        Err(ErreurDomaine::RacineNonConvergente.into())
    }
}

/// Itérations permises : phase de division par deux + phase quadratique (log2 précision)
/// + marge des réglages.
fn plafond_newton(v: &Flottant, marge: u32, ctx: Contexte) -> u64 {
    let approche = v.sommet().unsigned_abs() / 2;
    let quadratique = u64::from(u64::BITS - ctx.precision.leading_zeros());
    u64::from(marge)
        .saturating_add(approche)
        .saturating_add(quadratique)
}
