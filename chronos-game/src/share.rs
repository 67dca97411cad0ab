//! Reversible share codes naming a world seed.
//! Code format: CH-<WORD><NN>, e.g. CH-PORTAL42, CH-EPOCH07
use twox_hash::XxHash64;

const CODE_PREFIX: &str = "CH";
const HASH_DOMAIN: &[u8; 7] = b"CHRONOS";

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "PORTAL", "EPOCH", "ERA", "DAWN", "DUSK", "ORBIT", "COMET", "SOLAR", "LUNAR", "TIDE",
    "VORTEX", "RIFT", "WARP", "PULSE", "ECHO", "RELIC", "RUNE", "GLYPH", "DOLMEN", "MENHIR",
    "SARSEN", "LINTEL", "CIRCLE", "TRIAD", "DELTA", "REEF", "SQUALL", "COMPASS", "ANCHOR",
    "BEACON", "HOURS", "MINUTE", "SECOND", "CHIME", "GNOMON", "DIAL", "SUNDIAL", "PENDULUM",
    "GEAR", "SPRING", "CLOCK", "TICK", "TOCK", "AEON", "AGE", "CYCLE", "SEASON", "SOLSTICE",
    "EQUINOX", "ZENITH", "NADIR", "TWIST", "BIRCH", "PINE", "GROVE", "BOUGH", "ROOT", "MOSS",
    "VAULT", "KEY", "TREASURE", "CROWN", "SCEPTER", "LEGACY",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    (word_index & 0x01FF) | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    #[allow(clippy::cast_possible_truncation)]
    let nn = ((packed >> 9) & 0x7F) as u8;
    (packed & 0x01FF, nn)
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let mut buf = [0_u8; 10];
    buf[..7].copy_from_slice(HASH_DOMAIN);
    buf[7..9].copy_from_slice(&packed.to_le_bytes());
    buf[9] = 0xA5;
    let digest = XxHash64::oneshot(0, &buf);
    (digest & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render the share code for a seed produced by [`decode_share_code`].
///
/// Only the low 16 bits are encoded, so arbitrary seeds map onto the nearest
/// code rather than round-tripping.
#[must_use]
pub fn encode_share_code(seed: u64) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let (word_index, nn) = unpack((seed & 0xFFFF) as u16);
    let word_index = usize::from(word_index) % WORD_LIST.len();
    let word = WORD_LIST[word_index];
    format!("{CODE_PREFIX}-{word}{:02}", nn % 100)
}

/// Parse a share code (case-insensitive, prefix optional) into a world seed.
#[must_use]
pub fn decode_share_code(code: &str) -> Option<u64> {
    let code = code.trim();
    let rest = match code.split_once('-') {
        Some((prefix, rest)) if prefix.eq_ignore_ascii_case(CODE_PREFIX) => rest,
        Some(_) => return None,
        None => code,
    };
    if rest.len() < 3 || !rest.is_char_boundary(rest.len() - 2) {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    if !word_part.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let word = sanitize_word(word_part);
    let index = WORD_LIST.iter().position(|w| *w == word)?;
    let word_index = u16::try_from(index).ok()?;
    Some(compose_seed(word_index, nn))
}

/// Pick a share code from raw entropy.
#[must_use]
pub fn share_code_from_entropy(entropy: u64) -> String {
    let word_index = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    #[allow(clippy::cast_possible_truncation)]
    let nn = ((entropy >> 17) % 100) as u8;
    encode_share_code(compose_seed(word_index, nn))
}
