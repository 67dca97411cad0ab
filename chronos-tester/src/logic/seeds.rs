use anyhow::{Result, bail};
use chronos_game::decode_share_code;

/// A world seed requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// The share code the seed was given as, if any.
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    /// Share code when one was given, the number otherwise.
    #[must_use]
    pub fn label(&self) -> String {
        self.code.clone().unwrap_or_else(|| self.seed.to_string())
    }

    /// Seed for the `iteration`-th run; iteration 0 is the seed itself.
    #[must_use]
    pub fn for_iteration(&self, iteration: usize) -> Self {
        if iteration == 0 {
            return self.clone();
        }
        Self::from_numeric(
            self.seed
                .wrapping_add(u64::try_from(iteration).unwrap_or(u64::MAX)),
        )
    }
}

/// Resolve CLI seed arguments: literal integers or `CH-WORDNN` share codes.
///
/// # Errors
/// Returns an error for tokens that are neither.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut seeds: Vec<SeedInfo> = Vec::new();
    for token in tokens {
        let info = if let Ok(value) = token.parse::<u64>() {
            SeedInfo::from_numeric(value)
        } else if let Ok(value) = token.parse::<i64>() {
            SeedInfo::from_numeric(value.unsigned_abs())
        } else if let Some(seed) = decode_share_code(token) {
            SeedInfo {
                seed,
                code: Some(token.trim().to_ascii_uppercase()),
            }
        } else {
            bail!("invalid seed '{token}': expected a number or a share code like CH-VORTEX13");
        };
        if !seeds.iter().any(|existing| existing.seed == info.seed) {
            seeds.push(info);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds given");
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn numbers_and_codes_resolve() {
        let seeds = resolve_seed_inputs(&tokens(&["1337", "-5", "CH-VORTEX13"])).unwrap();
        assert_eq!(seeds.len(), 3);
        assert_eq!(seeds[0].seed, 1337);
        assert_eq!(seeds[1].seed, 5);
        assert_eq!(seeds[2].label(), "CH-VORTEX13");
        assert_eq!(seeds[0].label(), "1337");
        assert_eq!(decode_share_code("ch-vortex13"), Some(seeds[2].seed));
    }

    #[test]
    fn duplicates_collapse() {
        let seeds = resolve_seed_inputs(&tokens(&["7", "7"])).unwrap();
        assert_eq!(seeds.len(), 1);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(resolve_seed_inputs(&tokens(&["not-a-seed"])).is_err());
        assert!(resolve_seed_inputs(&[]).is_err());
    }

    #[test]
    fn iterations_offset_the_seed() {
        let base = SeedInfo::from_numeric(10);
        assert_eq!(base.for_iteration(0), base);
        assert_eq!(base.for_iteration(3).seed, 13);
    }
}
