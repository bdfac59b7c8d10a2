use rand::Rng;

/// Byte-wise Levenshtein distance.
pub(crate) fn levenshtein(a: &[u8], b: &[u8]) -> u64 {
    if a.is_empty() {
        return b.len() as u64;
    }
    let mut row: Vec<u64> = (0..=b.len() as u64).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut diag = row[0];
        row[0] = i as u64 + 1;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let cost = u64::from(ca != cb);
            row[j + 1] = (diag + cost).min(above + 1).min(row[j] + 1);
            diag = above;
        }
    }
    row[b.len()]
}

/// Applies up to `k` random single-byte edits, so the result is within
/// Levenshtein distance `k` of `w`.
pub(crate) fn mess<R: Rng>(rng: &mut R, w: &[u8], k: u64) -> Vec<u8> {
    let mut w = w.to_vec();
    for _ in 0..k {
        if w.len() <= 1 {
            break;
        }
        let c = rng.gen_range(b'a'..=b'z');
        match rng.gen_range(0..4) {
            0 => {
                let i = rng.gen_range(0..w.len());
                w.insert(i, c);
            }
            1 => {
                let i = rng.gen_range(0..w.len());
                w.remove(i);
            }
            2 => {
                let i = rng.gen_range(0..w.len());
                w[i] = c;
            }
            _ => {}
        }
    }
    w
}

pub(crate) fn sorted(mut v: Vec<&[u8]>) -> Vec<&[u8]> {
    v.sort();
    v
}

pub(crate) const DICT_SM: &[&str] = &[
    "assembly", "commuter", "commuters", "shrivel", "bolivia", "examining", "azimuthal", "dadaist",
    "psychopathic", "truss", "icicle", "gadwall", "superlatives", "opened", "unloading", "timid",
    "intervene", "occurrent", "precedences", "thermofax", "consummation", "russell", "intensified",
    "eradication", "hunches", "spade", "restraining", "discussant", "goodrich", "cathodes", "layers",
    "bookcase", "volleyballs", "sandals", "context", "validated", "felice", "munched", "vowels",
    "bose", "columnizing", "lodgepole", "affectation", "mulatto", "scepters", "coated", "villas",
    "armys", "dictum", "excitable", "radars", "dimmers", "underflowed", "unquoted", "seedbed",
    "ultracentrifuge", "syllables", "prospections", "employer", "pianist", "perplexing",
    "convocation", "ambient", "aries", "scissor", "delving", "vagarys", "rosenberg", "oyster",
    "hasty", "inquire", "rogue", "intensive", "mister", "tapis", "discovered", "knightly",
    "circumstances", "scientist", "percent", "homebound", "waxes", "partake", "rust", "goatees",
    "aggrieved", "kaufman", "tuberculin", "separators", "methodic", "polygon", "fecund",
    "francoise", "warfare", "disconcerting", "fuzziness", "drain", "smelter", "focussed",
    "thrilling", "despise",
];

#[test]
fn test_levenshtein() {
    assert_eq!(levenshtein(b"", b""), 0);
    assert_eq!(levenshtein(b"", b"abc"), 3);
    assert_eq!(levenshtein(b"abc", b""), 3);
    assert_eq!(levenshtein(b"kitten", b"sitting"), 3);
    assert_eq!(levenshtein(b"abc", b"abd"), 1);
    assert_eq!(levenshtein(b"abc", b"xyz"), 3);
    assert_eq!(levenshtein(b"flaw", b"lawn"), 2);
}
