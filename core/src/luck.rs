use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0001_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |state, &byte| {
        (state ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Maps `key` to a value in `[0, 1)`, a pure function of the key.
///
/// Output must not change across platforms or releases: saved games replay every draw after a reload.
pub fn luck(key: &str) -> f64 {
    let mut rng = ChaCha8Rng::seed_from_u64(fnv1a(key.as_bytes()));
    rng.random::<f64>()
}

/// Picks an element of `items` using the draw for `key`. `items` must not be empty.
pub fn pick<'a, T>(key: &str, items: &'a [T]) -> &'a T {
    debug_assert!(!items.is_empty(), "pick from an empty list");
    let index = (luck(key) * items.len() as f64) as usize;
    &items[index.min(items.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_gives_same_value() {
        for key in ["", "0,0", "descA,-12,40", "initialCoins,369995,-1220533"] {
            assert_eq!(luck(key), luck(key));
        }
    }

    #[test]
    fn values_match_pinned_stream() {
        assert_eq!(luck("0,0"), 0.5709854036178068);
        assert_eq!(luck("initialCoins,369995,-1220533"), 0.9916019044605383);
        assert_eq!(luck(""), 0.049489193710795853);
    }

    #[test]
    #[should_panic(expected = "pick from an empty list")]
    #[cfg(debug_assertions)]
    fn pick_rejects_empty_list() {
        pick::<u8>("0,0", &[]);
    }

    #[test]
    fn values_stay_in_unit_interval() {
        for i in -50..50 {
            let value = luck(&format!("{},{}", i, i * 7));
            assert!((0.0..1.0).contains(&value), "{} out of range", value);
        }
    }

    #[test]
    fn different_keys_spread_out() {
        let values: Vec<f64> = (0..64).map(|i| luck(&format!("{},0", i))).collect();
        let below_half = values.iter().filter(|&&v| v < 0.5).count();

        assert!(below_half > 8 && below_half < 56);
        assert!(values.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn fnv1a_matches_reference_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn pick_is_deterministic_and_in_bounds() {
        let words = ["a", "b", "c"];
        for i in 0..32 {
            let key = format!("pick,{}", i);
            let picked = pick(&key, &words);
            assert!(words.contains(picked));
            assert_eq!(picked, pick(&key, &words));
        }
    }
}
