//! Localized UI strings for the five catalog languages.
//!
//! Templates use `{name}` placeholders filled in by [`translate`].

use geoquiz_core::Language;

/// Index into a per-language row of `TABLE`.
fn column(lang: Language) -> usize {
    match lang {
        Language::Es => 0,
        Language::En => 1,
        Language::De => 2,
        Language::It => 3,
        Language::Pt => 4,
    }
}

type Row = (&'static str, [&'static str; 5]);

//            key                           ES / EN / DE / IT / PT
const TABLE: &[Row] = &[
    ("menu.region", [
        "1) Mundo  2) Por continente",
        "1) World  2) By continent",
        "1) Welt  2) Nach Kontinent",
        "1) Mondo  2) Per continente",
        "1) Mundo  2) Por continente",
    ]),
    ("menu.continent", [
        "Elige un continente:",
        "Choose a continent:",
        "Wähle einen Kontinent:",
        "Scegli un continente:",
        "Escolha um continente:",
    ]),
    ("menu.mode", [
        "1) Banderas {flags}  2) Capitales {capitals}",
        "1) Flags {flags}  2) Capitals {capitals}",
        "1) Flaggen {flags}  2) Hauptstädte {capitals}",
        "1) Bandiere {flags}  2) Capitali {capitals}",
        "1) Bandeiras {flags}  2) Capitais {capitals}",
    ]),
    ("menu.quiz_type", [
        "1) País -> capital {country}  2) Capital -> país {capital}",
        "1) Country -> capital {country}  2) Capital -> country {capital}",
        "1) Land -> Hauptstadt {country}  2) Hauptstadt -> Land {capital}",
        "1) Paese -> capitale {country}  2) Capitale -> paese {capital}",
        "1) País -> capital {country}  2) Capital -> país {capital}",
    ]),
    ("menu.help", [
        "Comandos: :skip :back :lang XX :progress :quit",
        "Commands: :skip :back :lang XX :progress :quit",
        "Befehle: :skip :back :lang XX :progress :quit",
        "Comandi: :skip :back :lang XX :progress :quit",
        "Comandos: :skip :back :lang XX :progress :quit",
    ]),
    ("menu.invalid", [
        "Opción no válida.",
        "Invalid option.",
        "Ungültige Auswahl.",
        "Opzione non valida.",
        "Opção inválida.",
    ]),
    ("prompt.flag", [
        "¿De qué país es la bandera {flag}? ({score}/{total})",
        "Which country has the flag {flag}? ({score}/{total})",
        "Zu welchem Land gehört die Flagge {flag}? ({score}/{total})",
        "Di quale paese è la bandiera {flag}? ({score}/{total})",
        "De que país é a bandeira {flag}? ({score}/{total})",
    ]),
    ("prompt.capital_of", [
        "¿Cuál es la capital de {country}? ({score}/{total})",
        "What is the capital of {country}? ({score}/{total})",
        "Was ist die Hauptstadt von {country}? ({score}/{total})",
        "Qual è la capitale di {country}? ({score}/{total})",
        "Qual é a capital de {country}? ({score}/{total})",
    ]),
    ("prompt.country_of", [
        "¿De qué país es capital {capital}? ({score}/{total})",
        "{capital} is the capital of which country? ({score}/{total})",
        "{capital} ist die Hauptstadt welches Landes? ({score}/{total})",
        "{capital} è la capitale di quale paese? ({score}/{total})",
        "{capital} é a capital de qual país? ({score}/{total})",
    ]),
    ("msg.correct", [
        "¡Correcto!",
        "Correct!",
        "Richtig!",
        "Corretto!",
        "Correto!",
    ]),
    ("msg.correct_full_name", [
        "¡Correcto! Nombre completo: {country}",
        "Correct! Full name: {country}",
        "Richtig! Vollständiger Name: {country}",
        "Corretto! Nome completo: {country}",
        "Correto! Nome completo: {country}",
    ]),
    ("msg.wrong_country", [
        "Incorrecto. Era {answer}",
        "Wrong. It was {answer}",
        "Falsch. Es war {answer}",
        "Sbagliato. Era {answer}",
        "Errado. Era {answer}",
    ]),
    ("msg.wrong_capital", [
        "Incorrecto. La capital es {answer}",
        "Wrong. The capital is {answer}",
        "Falsch. Die Hauptstadt ist {answer}",
        "Sbagliato. La capitale è {answer}",
        "Errado. A capital é {answer}",
    ]),
    ("msg.abbreviations", [
        "(abreviaturas: {list})",
        "(abbreviations: {list})",
        "(Abkürzungen: {list})",
        "(abbreviazioni: {list})",
        "(abreviaturas: {list})",
    ]),
    ("msg.skipped_flag", [
        "Saltado: era {country}",
        "Skipped: it was {country}",
        "Übersprungen: es war {country}",
        "Saltato: era {country}",
        "Pulado: era {country}",
    ]),
    ("msg.skipped_capital_country", [
        "Saltado: la capital de {country} es {capital}",
        "Skipped: the capital of {country} is {capital}",
        "Übersprungen: die Hauptstadt von {country} ist {capital}",
        "Saltato: la capitale di {country} è {capital}",
        "Pulado: a capital de {country} é {capital}",
    ]),
    ("msg.skipped_capital_name", [
        "Saltado: {capital} es la capital de {country}",
        "Skipped: {capital} is the capital of {country}",
        "Übersprungen: {capital} ist die Hauptstadt von {country}",
        "Saltato: {capital} è la capitale di {country}",
        "Pulado: {capital} é a capital de {country}",
    ]),
    ("msg.round_extra", [
        "¡Ronda extra! Repasa los {count} fallos.",
        "Extra round! Review your {count} misses.",
        "Extrarunde! Wiederhole deine {count} Fehler.",
        "Round extra! Ripassa i tuoi {count} errori.",
        "Rodada extra! Revise os seus {count} erros.",
    ]),
    ("msg.congrats_all", [
        "¡Perfecto! Acertaste todos en {time} s.",
        "Perfect! You got them all in {time} s.",
        "Perfekt! Alle richtig in {time} s.",
        "Perfetto! Tutti giusti in {time} s.",
        "Perfeito! Acertou todos em {time} s.",
    ]),
    ("msg.congrats_completed", [
        "Completado: {score}/{total} (mejor {max_score}) en {time} s.",
        "Completed: {score}/{total} (best {max_score}) in {time} s.",
        "Abgeschlossen: {score}/{total} (beste {max_score}) in {time} s.",
        "Completato: {score}/{total} (migliore {max_score}) in {time} s.",
        "Concluído: {score}/{total} (melhor {max_score}) em {time} s.",
    ]),
    ("msg.resumed", [
        "Continuando: {score}/{total}",
        "Resuming: {score}/{total}",
        "Fortsetzen: {score}/{total}",
        "Si riprende: {score}/{total}",
        "Continuando: {score}/{total}",
    ]),
    ("msg.empty_region", [
        "No hay países para {region}.",
        "No countries for {region}.",
        "Keine Länder für {region}.",
        "Nessun paese per {region}.",
        "Não há países para {region}.",
    ]),
    ("msg.language", [
        "Idioma: {lang}",
        "Language: {lang}",
        "Sprache: {lang}",
        "Lingua: {lang}",
        "Idioma: {lang}",
    ]),
    ("msg.bye", [
        "¡Hasta luego!",
        "Goodbye!",
        "Auf Wiedersehen!",
        "Arrivederci!",
        "Até logo!",
    ]),
];

/// Look up `key` for `lang` and fill in `{name}` placeholders.
///
/// Unknown keys come back verbatim so a missing entry shows up on screen
/// instead of failing.
pub fn translate(lang: Language, key: &str, substitutions: &[(&str, String)]) -> String {
    let Some((_, row)) = TABLE.iter().find(|(k, _)| *k == key) else {
        tracing::warn!(key, "missing translation");
        return key.to_string();
    };
    substitutions
        .iter()
        .fold(row[column(lang)].to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}
