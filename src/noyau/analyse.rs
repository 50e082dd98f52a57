// src/noyau/analyse.rs
//
// Descente récursive, évaluation à la volée (pas d’AST matérialisé).
//
// Grammaire (précédence croissante) :
//   expression := terme   ( ('+' | '-') terme )*
//   terme      := facteur ( ('*' | '/') facteur )*
//   facteur    := puissance ( '!' )*                 postfixé, gauche -> droite
//   puissance  := primaire ( '^' facteur )?          exposant = facteur => associatif à droite
//   primaire   := NOMBRE
//               | '-' primaire                        moins unaire récursif (-- autorisé)
//               | '(' expression ')'
//               | 'sqrt' '(' expression ')'
//
// Conséquences voulues :
// - 2^3^2 = 2^(3^2) = 512
// - 2^3!  = 2^(3!)  = 64   (la factorielle lie plus fort que la puissance à droite)
// - -2^2  = (-2)^2  = 4    (le moins unaire appartient au primaire)
//
// Seul état mutable : le jeton courant + le reste de la suite (curseur).

use super::erreur::{ErreurCalcul, ErreurDomaine, ErreurFormat, ErreurSyntaxe};
use super::flottant::Flottant;
use super::jetons::{Jeton, TypeJeton};
use super::primitives::Primitives;
use super::reglages::Reglages;

pub struct Analyseur<'r> {
    jetons: std::vec::IntoIter<Jeton>,
    courant: Jeton,
    prim: Primitives<'r>,
    profondeur: usize,
    profondeur_max: usize,
}

impl<'r> Analyseur<'r> {
    /// `jetons` : suite complète produite par `tokenize` (terminée par Fin).
    pub fn new(jetons: Vec<Jeton>, reglages: &'r Reglages) -> Self {
        let mut jetons = jetons.into_iter();
        let courant = jetons.next().unwrap_or_else(Jeton::fin);
        Self {
            jetons,
            courant,
            prim: Primitives::expression(reglages),
            profondeur: 0,
            profondeur_max: reglages.profondeur_max(),
        }
    }

    fn avancer(&mut self) {
        // au-delà de Fin, on reste sur Fin
        self.courant = self.jetons.next().unwrap_or_else(Jeton::fin);
    }

    fn genre(&self) -> TypeJeton {
        self.courant.genre
    }

    /// Garde-fou d’imbrication : toute boucle de récursion passe par facteur ou primaire.
    fn imbrique<T>(
        &mut self,
        regle: impl FnOnce(&mut Self) -> Result<T, ErreurCalcul>,
    ) -> Result<T, ErreurCalcul> {
        if self.profondeur >= self.profondeur_max {
            return Err(ErreurSyntaxe::TropImbrique.into());
        }
        self.profondeur += 1;
        let r = regle(self);
        self.profondeur -= 1;
        r
    }

    /* ------------------------ Règles ------------------------ */

    pub fn expression(&mut self) -> Result<Flottant, ErreurCalcul> {
        let mut gauche = self.terme()?;

        loop {
            match self.genre() {
                TypeJeton::Plus => {
                    self.avancer();
                    let droite = self.terme()?;
                    gauche = self.prim.ajouter(&gauche, &droite)?;
                }
                TypeJeton::Moins => {
                    self.avancer();
                    let droite = self.terme()?;
                    gauche = self.prim.soustraire(&gauche, &droite)?;
                }
                _ => return Ok(gauche),
            }
        }
    }

    fn terme(&mut self) -> Result<Flottant, ErreurCalcul> {
        let mut gauche = self.facteur()?;

        loop {
            match self.genre() {
                TypeJeton::Fois => {
                    self.avancer();
                    let droite = self.facteur()?;
                    gauche = self.prim.multiplier(&gauche, &droite)?;
                }
                TypeJeton::Divise => {
                    self.avancer();
                    let droite = self.facteur()?;
                    gauche = self.prim.diviser(&gauche, &droite)?;
                }
                _ => return Ok(gauche),
            }
        }
    }

    fn facteur(&mut self) -> Result<Flottant, ErreurCalcul> {
        self.imbrique(|a| {
            let mut v = a.puissance()?;
            while a.genre() == TypeJeton::Factorielle {
                a.avancer();
                v = a.prim.factorielle(&v)?;
            }
            Ok(v)
        })
    }

    fn puissance(&mut self) -> Result<Flottant, ErreurCalcul> {
        let base = self.primaire()?;
        if self.genre() != TypeJeton::Puissance {
            return Ok(base);
        }
        self.avancer();
        let exposant = self.facteur()?;
        log::trace!("puissance: exposant lu, réduction");
        self.prim.puissance(&base, &exposant)
    }

    fn primaire(&mut self) -> Result<Flottant, ErreurCalcul> {
        self.imbrique(|a| match a.genre() {
            TypeJeton::Nombre => {
                let v = a
                    .prim
                    .nombre(&a.courant.texte)
                    .ok_or_else(|| ErreurFormat::NombreInvalide(a.courant.texte.clone()))?;
                a.avancer();
                Ok(v)
            }

            TypeJeton::Moins => {
                a.avancer();
                Ok(a.primaire()?.neg())
            }

            TypeJeton::LPar => {
                a.avancer();
                let v = a.expression()?;
                a.fermer()?;
                Ok(v)
            }

            TypeJeton::Racine => {
                a.avancer();
                if a.genre() != TypeJeton::LPar {
                    return Err(ErreurSyntaxe::ParentheseOuvranteAttendue.into());
                }
                a.avancer();
                let v = a.expression()?;
                a.fermer()?;
                if v.est_negatif() {
                    return Err(ErreurDomaine::RacineNegative.into());
                }
                a.prim.racine_carree(&v)
            }

            autre => Err(ErreurSyntaxe::JetonInattendu(autre).into()),
        })
    }

    fn fermer(&mut self) -> Result<(), ErreurCalcul> {
        if self.genre() != TypeJeton::RPar {
            return Err(ErreurSyntaxe::ParentheseFermanteAttendue.into());
        }
        self.avancer();
        Ok(())
    }

    /// Après l’expression complète : le curseur doit être sur Fin.
    /// Une ')' orpheline est signalée comme jeton inattendu.
    pub fn terminer(&self) -> Result<(), ErreurCalcul> {
        match self.genre() {
            TypeJeton::Fin => Ok(()),
            TypeJeton::RPar => Err(ErreurSyntaxe::JetonInattendu(TypeJeton::RPar).into()),
            autre => Err(ErreurSyntaxe::FinAttendue(autre).into()),
        }
    }
}
