//! # Prompt Assembler
//!
//! Composes the request sent to the generation service from a [`Submission`] and its
//! server-side [`GradeResult`]. The user prompt is built from fixed blocks in a fixed order:
//!
//! 1. `DATOS`: statement, base code, student code and two presence flags.
//! 2. `CASOS DE PRUEBA`: only when test cases were sent.
//! 3. `RESULTADOS CASOS DE PRUEBA`: only when evidence was sent.
//! 4. `RESTRICCIONES`: the raw text plus the `R1..Rn` checklist, or an explicit
//!    "(no aportadas)" marker when no constraints were sent.
//! 5. `RESUMEN SERVIDOR`: only when the evidence could be graded.
//!
//! Optional blocks are omitted entirely rather than emitted empty. Generation quality depends
//! on this layout, so the order must not change.

use crate::parsers::constraint_parser::ConstraintParser;
use crate::traits::parser::Parser;
use crate::types::{ClipLimits, Evidence, GradeResult, Submission};
use crate::utilities::clip::clip;
use crate::utilities::pretty::{pretty_block, pretty_text};

/// Marker the generator must put on its last line.
pub const FINAL_GRADE_MARKER: &str = "NOTA_IA:";
/// Marker the generator must never emit; test grades are computed on the server.
pub const FORBIDDEN_GRADE_MARKER: &str = "NOTA_TESTS:";

/// Fixed system instructions.
pub const SYSTEM_INSTRUCTIONS: &str = "\
Eres corrector de ejercicios de programación. Habla al alumno (tú) con claridad.
Líneas ≤ 90 caracteres y sin dobles saltos. Extensión objetivo: 14–24 líneas.

Casos (si hay evidencia): DI qué casos pasan/fallan y por qué. Si NO hay evidencia,
no inventes resultados: di que no hay datos de ejecución.

RESTRICCIONES: usa SOLO el sub-bloque 'Obligaciones:' como checklist estricto. El
sub-bloque 'Recomendaciones:' NO es obligatorio y solo aporta sugerencias. Si no hay
encabezados, trata todo el texto como Obligaciones. Enumera R1..Rn siguiendo el orden
de bullets y marca: 'Cumple' / 'No cumple' / 'No verificable' + evidencia breve.
Sé conservador: si no lo ves en el código, 'No verificable'. Citas útiles: 'import math',
comprensiones '[x for x in y]', 'break/return' en bucles, múltiples 'return', E/S exacta.

Ajuste a código base/contratos: si 'CÓDIGO BASE' está vacío, indícalo. Si existe,
comprueba firmas/nombres/contratos y cita faltas concretas.

Formato de salida (en este orden):
Corrección
- Resumen (1–2 líneas). Si hay evidencia, añade 'Casos: X/Y'. Si no hay, dilo.
- Cumplimiento del enunciado (concreto y verificable).
- Ajuste al código base/contratos (cita faltas si las hay).
- Complejidad/eficiencia y posibles errores.
- Análisis de casos: 'casoN: ✔/✘ - motivo' (si no hay evidencia, omite esta sección).
- Chequeo de RESTRICCIONES OBLIGATORIAS: lista R1..Rn con Cumple/No cumple/
  No verificable + motivo breve por cada una. NO mezcles Recomendaciones aquí.
- Consejos de mejora (bullets accionables). Apóyate en Recomendaciones cuando aplique.
- Buenas prácticas detectadas.
- Próximos pasos (2–3 bullets).

REGLAS PARA NOTA_IA Y CIERRE FINAL
0) TEXTO PLANO: la nota final debe ir en una línea normal, sin Markdown, sin '\\',
sin código y sin formato especial.
1) NOTA_IA (0–10), SIN usar tests: valora enunciado, cumplimiento de RESTRICCIONES,
   ajuste al código base/contratos y legibilidad/estilo. Cualquier 'No cumple' debe
   penalizar. Da una única cifra y una justificación breve (≤140 caracteres). No
   menciones tests NI escribas ninguna línea de 'NOTA_TESTS'.
2) Cierre obligatorio (ÚLTIMA línea, exactamente esta y nada más debajo):
   NOTA_IA: <0-10> - <justificación≤140c>
";

const CONSTRAINT_RULES: &str = "\
RESTRICCIONES — LEE ESTAS NORMAS PARA EVALUAR
1) Considera OBLIGATORIAS únicamente las que estén bajo el encabezado literal
   'Obligaciones:' en el texto siguiente.
2) Todo lo bajo 'Recomendaciones:' NO es obligatorio; úsalo solo como consejo.
3) Si el texto NO contiene encabezados, asume que TODO lo que sigue es OBLIGATORIO.
4) Extrae cada restricción como bullet si empieza por '*', '-', o '•'.";

/// The assembled request content, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub instructions: String,
    pub user_prompt: String,
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Sí" } else { "No" }
}

fn render_evidence(evidence: &Evidence) -> String {
    match evidence {
        Evidence::Structured(value) => pretty_block(value),
        Evidence::Text(text) => pretty_text(text),
    }
}

/// Builds the prompt for `submission`. Deterministic for identical inputs.
pub fn assemble(
    submission: &Submission,
    grade: Option<&GradeResult>,
    limits: ClipLimits,
) -> PromptPayload {
    let cases_txt = clip(&pretty_block(&submission.test_cases), limits.cases);
    let constraints_txt = clip(&submission.constraints, limits.constraints);
    let has_constraints = !constraints_txt.trim().is_empty();
    let has_base_code = !submission.base_code.trim().is_empty();

    let mut prompt = format!(
        "\nDATOS\nENUNCIADO:\n{}\n\nCÓDIGO BASE:\n{}\n\nCÓDIGO DEL ALUMNO:\n{}\n\n\
         PRESENCIA_DE_CODIGO_BASE: {}\nPRESENCIA_DE_RESTRICCIONES: {}\n",
        submission.statement,
        submission.base_code,
        submission.code,
        yes_no(has_base_code),
        yes_no(has_constraints),
    );

    if !cases_txt.is_empty() {
        prompt.push_str(&format!("\n\nCASOS DE PRUEBA (texto):\n{cases_txt}\n"));
    }

    if let Some(evidence) = &submission.evidence {
        let evidence_txt = clip(&render_evidence(evidence), limits.evidence);
        prompt.push_str(&format!(
            "\n\nRESULTADOS CASOS DE PRUEBA (log/JSON):\n{evidence_txt}\n"
        ));
    }

    if has_constraints {
        let checklist = ConstraintParser.parse(constraints_txt.as_str());
        let rendered = if checklist.is_empty() {
            "(no bullets detectados)".to_string()
        } else {
            checklist.render()
        };
        prompt.push_str(&format!(
            "\n\n{CONSTRAINT_RULES}\n\n=== TEXTO DE RESTRICCIONES (tal cual) ===\n\
             {constraints_txt}\n=== FIN TEXTO ===\n\n\
             LISTA NORMALIZADA (para referenciar R1..Rn):\n{rendered}\n"
        ));
    } else {
        prompt.push_str("\n\nRESTRICCIONES:\n(no aportadas)\n");
    }

    if let Some(grade) = grade {
        prompt.push_str(&format!(
            "\n\nRESUMEN SERVIDOR (no citar nota):\n{}\n",
            grade.summary()
        ));
    }

    PromptPayload {
        instructions: SYSTEM_INSTRUCTIONS.to_string(),
        user_prompt: prompt,
    }
}
