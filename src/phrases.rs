//! Quotes printed on stickers

use rand::Rng;

/// Default quote pool. Explicit `\n` breaks are honoured by the text fitter.
pub const PHRASES: [&str; 21] = [
    "\"Folk opfører sig som idioter.\"",
    "\"Det lyder som\nen krigszone.\"",
    "\"Jeg hader\nden her tradition.\"",
    "\"Hvorfor er det\nstadig tilladt?\"",
    "\"Min hund er\nfuldstændig smadret.\"",
    "\"Jeg tæller timerne\ntil det stopper.\"",
    "\"Hvem synes seriøst\ndet her er fedt?\"",
    "\"Jeg får hjertebanken\nhver gang.\"",
    "\"Det føles\naggressivt.\"",
    "\"Man kan ikke\nslippe væk.\"",
    "\"Folk skyder af\nsom galninge.\"",
    "\"Det er kaotisk\nog dumt.\"",
    "\"Jeg bliver hjemme\nog lukker alt.\"",
    "\"Nytår er\ndet værste døgn.\"",
    "\"Ingen tager\nhensyn.\"",
    "\"Det larmer mere\nhvert år.\"",
    "\"Jeg føler mig som\nden eneste der hader det.\"",
    "\"Hvorfor skal det\nvære så voldsomt?\"",
    "\"Jeg bliver\nkaldt sart.\"",
    "\"Det er ren\noverlevelse\"",
    "\"Det er helt ude\naf kontrol.\"",
];

pub fn default_phrases() -> Vec<String> {
    PHRASES.iter().map(|p| p.to_string()).collect()
}

/// Uniform pick; an empty pool yields an empty string
pub fn pick_phrase<'a, R: Rng>(rng: &mut R, pool: &'a [String]) -> &'a str {
    if pool.is_empty() {
        return "";
    }
    &pool[rng.random_range(0..pool.len())]
}
