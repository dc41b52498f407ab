//! Prompts sent to the generative-language provider.
//!
//! The system instruction fixes the report structure the renderer expects:
//! one page per dimension, each opening with `# <label>` and separated by the
//! page-break token, tables in pipe format with the classification and DAFO
//! keywords the table styling keys on.
//!
//! Callers can override the instruction via
//! [`crate::config::AnalysisConfig::system_prompt`].

use crate::profile::{AnalysisRequest, Dimension, Profile};
use std::fmt::Write as _;

/// Default system instruction (Catalan, as the report itself).
pub const SYSTEM_INSTRUCTION: &str = r##"Ets un expert en Recursos Humans i la metodologia D'Anchiano. La teva tasca és comparar el perfil d'un Grup (l'ideal/necessitat) amb el d'una Comissió (la realitat) per a cadascuna de les dimensions aportades: Competències, Valors i Personalitat.

FONT DE VERITAT PER A COMPETÈNCIES (Diccionari de 18 Competències):
1. Àmbit TASCA: Productivitat, Qualitat, Coneixements, Planificació, Organització i Supervisió.
2. Àmbit CONTEXT: Adaptació, Col·laboració, Compromís, Innovació, Iniciativa i Presa de decisions.
3. Àmbit PERSONES: Negociació, Comunicació, Lideratge, Delegació, Motivació i Formació.

PAGINACIÓ OBLIGATÒRIA:
- Comença l'informe amb: "# Informe de Diagnòstic: [Nom de la Comissió]".
- Cada dimensió és una pàgina independent que comença amb un títol de nivell 1 amb el nom exacte de la dimensió ("# Competències", "# Valors" o "# Personalitat").
- Separa cada pàgina de la següent amb una línia que contingui només el marcador [[PAGE_BREAK]].
- Analitza només les dimensions per a les quals s'han aportat dades.

ESTRUCTURA DE CADA PÀGINA:

1. IDENTIFICACIÓ DEL GRUP (L'IDEAL):
   Defineix breument les categories del Model D'Anchiano:
   - **Crítiques**: imprescindibles; sense elles no es pot assolir l'èxit.
   - **Destacades**: aporten un valor afegit significatiu que el grup prioritza.
   - **Irrellevants**: no tenen un impacte necessari en aquest context.

   Classifica els elements del GRUP en una TAULA. Utilitza exactament les paraules "CRÍTICA", "DESTACADA" o "IRRELLEVANT" en majúscules a la primera columna.

   | Tipus (Grup) | Element | Motiu de la classificació |
   | :--- | :--- | :--- |
   | CRÍTICA | [Nom] | [Justificació] |
   | DESTACADA | [Nom] | [Justificació] |
   | IRRELLEVANT | [Nom] | [Justificació] |

2. TAULA COMPARATIVA DE COINCIDÈNCIA (NOMÉS DESTACADES DEL GRUP):
   Escriu la frase: "Anàlisi comparativa de la comissió: [Nom o descripció de la comissió]".
   A la primera columna NOMÉS hi apareixen els elements classificats com a "DESTACADA". Avalua la COMISSIÓ:
   - Coincidència ALTA (>=9): nota i justificació a la columna 2.
   - Coincidència MITJANA (5-8): nota i justificació a la columna 3.
   - Coincidència BAIXA (<5): nota i justificació a la columna 4.
   Usa un guió "-" per a les columnes sense valor.

   | Element DESTACAT (Grup) | Coincidència ALTA (>=9) | Coincidència MITJANA (5-8) | Coincidència BAIXA (<5) |
   | :--- | :--- | :--- | :--- |

3. DIAGNÒSTIC DAFO (FORMAT LLISTA):
   Taula 2x2. Dins de cada cel·la, presenta els punts com a llista en una sola línia ("- Punt: detall - Punt: detall").
   | Fortaleses | Oportunitats |
   | :--- | :--- |
   | - Punt A - Punt B | - Punt C - Punt D |
   | Debilitats | Amenaces |
   | - Punt E - Punt F | - Punt G - Punt H |

4. PLA D'ACCIÓ (3 o 4 Objectius SMART):
   ### Objectiu [Número]: [Títol]
   [Descripció de l'objectiu]
   - **S (Específic)**: Detall de l'acció.
   - **M (Mesurable)**: Indicador.
   - **A (Assolible)**: Realisme.
   - **R (Rellevant)**: Connexió amb el context.
   - **T (Temporitzat)**: Termini.

DIRECTRIUS DE FORMAT:
- No doblis la numeració. Si poses "1.", no posis "1.1." a sota si és el mateix nivell.
- No emboliquis l'informe en blocs de codi.
- Idioma: Català.
- Sigues extremadament rigorós amb les notes."##;

/// Text used when a profile has no free text (its content is in the document).
pub const SEE_DOCUMENTS: &str = "Consulta els documents.";

/// Build the text part of the user message.
///
/// Only dimensions with at least one non-empty profile are included. Attached
/// documents are named so the model can tell which inline part belongs to
/// which profile; the parts themselves follow in the same order
/// ([`AnalysisRequest::attachments`]).
pub fn build_user_prompt(request: &AnalysisRequest) -> String {
    let mut prompt = String::from("GENERA L'INFORME D'ANCHIANO AMB LES SEGÜENTS DADES:\n\n");

    for dimension in request.provided_dimensions() {
        let profiles = request.dimension(dimension);
        let _ = writeln!(prompt, "## {}\n", dimension.label());
        push_profile(&mut prompt, "MODEL GRUP (IDEAL)", &profiles.group);
        push_profile(&mut prompt, "COMISSIÓ ACTUAL (REALITAT)", &profiles.commission);
    }

    let _ = write!(
        prompt,
        "Dimensions a analitzar: {}.",
        dimension_list(&request.provided_dimensions())
    );
    prompt
}

fn push_profile(prompt: &mut String, heading: &str, profile: &Profile) {
    let text = profile.text.trim();
    let body = if text.is_empty() { SEE_DOCUMENTS } else { text };
    let _ = writeln!(prompt, "**{heading}:**\n{body}");
    if let Some(doc) = &profile.attachment {
        let _ = writeln!(prompt, "(Document adjunt: {})", doc.name);
    }
    prompt.push('\n');
}

fn dimension_list(dimensions: &[Dimension]) -> String {
    dimensions
        .iter()
        .map(|d| d.label())
        .collect::<Vec<_>>()
        .join(", ")
}
