// Parimutuel payout arithmetic.
//
// Everything here is a pure function over (book totals, fee rate); rewards
// are computed on demand and never stored. All arithmetic is integer
// multiply-before-divide with truncation, matching the reference results of
// the on-chain implementation. Winners split the net pool proportionally to
// their stake on the winning outcome:
//
//   net_pool = gross_pool * (10000 - fee_bps) / 10000
//   reward   = stake * net_pool / total_for(winner)

pub const BPS_DENOMINATOR: u64 = 10_000;

/// Exact floor of `amount * numerator / denominator`. The product is carried
/// through a 256-bit (hi, lo) pair so no pool size can overflow on the way;
/// callers keep the quotient itself within u128 (stake <= total on winner,
/// fee ratios <= 1).
pub fn mul_ratio(amount: u128, numerator: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        return 0;
    }
    let (hi, lo) = mul_wide(amount, numerator);
    if hi == 0 {
        lo / denominator
    } else {
        div_wide(hi, lo, denominator)
    }
}

/// 256-bit product of two u128s, schoolbook over 64-bit limbs.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = u64::MAX as u128;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    // mid sums three 64-bit-limb terms, stays well within u128
    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (mid << 64) | (ll & MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}

/// Binary long division of a 256-bit value by a nonzero u128. Quotient bits
/// above u128 are dropped; callers guarantee the result fits.
fn div_wide(hi: u128, lo: u128, divisor: u128) -> u128 {
    let mut quot: u128 = 0;
    let mut rem: u128 = 0;
    for i in (0..256).rev() {
        let bit = if i >= 128 {
            (hi >> (i - 128)) & 1
        } else {
            (lo >> i) & 1
        };
        // the shifted-out bit makes the partial remainder >= 2^128 > divisor
        let carried = rem >> 127;
        rem = (rem << 1) | bit;
        quot <<= 1;
        if carried == 1 || rem >= divisor {
            rem = rem.wrapping_sub(divisor);
            quot |= 1;
        }
    }
    quot
}

/// Fee withheld from the gross pool at resolution, truncating.
pub fn fee_amount(gross_pool: u128, fee_bps: u64) -> u128 {
    if fee_bps == 0 {
        return 0;
    }
    mul_ratio(gross_pool, fee_bps as u128, BPS_DENOMINATOR as u128)
}

/// Pool distributed to winners after the fee is withheld, truncating.
pub fn net_pool(gross_pool: u128, fee_bps: u64) -> u128 {
    mul_ratio(
        gross_pool,
        (BPS_DENOMINATOR - fee_bps) as u128,
        BPS_DENOMINATOR as u128,
    )
}

/// A participant's share of the net pool, proportional to their stake on the
/// winning outcome. Zero when nobody (or this participant) staked the winner.
pub fn reward(stake: u128, total_on_winner: u128, net_pool: u128) -> u128 {
    if stake == 0 || total_on_winner == 0 || net_pool == 0 {
        return 0;
    }
    mul_ratio(net_pool, stake, total_on_winner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_ratio_truncates() {
        assert_eq!(mul_ratio(21, 5, 8), 13); // 13.125
        assert_eq!(mul_ratio(21, 3, 8), 7); // 7.875
        assert_eq!(mul_ratio(21, 10, 13), 16); // 16.153846...
        assert_eq!(mul_ratio(7, 1, 0), 0);
    }

    #[test]
    fn test_mul_ratio_survives_large_pools() {
        let huge = u128::MAX / 2;
        assert_eq!(mul_ratio(huge, 2, 2), huge);

        let shaved = mul_ratio(huge, 9_750, 10_000);
        assert!(shaved < huge);
        // truncation loses less than one whole denominator's worth
        assert!(huge - shaved <= huge / 10_000 * 250 + 250);
    }

    #[test]
    fn test_mul_ratio_wide_intermediate_product() {
        // remainder and numerator both past 2^64: the raw product needs 256 bits
        // 2^65 * (2^67 - 1) / 2^66 == 2^66 - 1/2, floored
        assert_eq!(
            reward(1u128 << 65, 1u128 << 66, (1u128 << 67) - 1),
            (1u128 << 66) - 1
        );
        // identity holds at the extreme
        assert_eq!(mul_ratio(u128::MAX, u128::MAX, u128::MAX), u128::MAX);
        // 3 * (2^128 - 1) / 4 == 3 * 2^126 - 3/4, floored
        assert_eq!(mul_ratio(u128::MAX, 3, 4), 3 * (1u128 << 126) - 1);
    }

    #[test]
    fn test_fee_and_net_pool() {
        assert_eq!(fee_amount(21_000, 0), 0);
        assert_eq!(net_pool(21_000, 0), 21_000);

        // 2.5% of the gross pool, as the reference deployment configures
        assert_eq!(fee_amount(21_000, 250), 525);
        assert_eq!(net_pool(21_000, 250), 20_475);

        // fee + net never exceed gross
        assert!(fee_amount(999, 333) + net_pool(999, 333) <= 999);
    }

    #[test]
    fn test_reward_proportional_split() {
        // scenario A at scale 1000: pool 21000, team1 total 8000
        assert_eq!(reward(5_000, 8_000, 21_000), 13_125);
        assert_eq!(reward(3_000, 8_000, 21_000), 7_875);
        // whole net pool is paid out when stakes divide it exactly
        assert_eq!(reward(5_000, 8_000, 21_000) + reward(3_000, 8_000, 21_000), 21_000);
    }

    #[test]
    fn test_reward_zero_guards() {
        assert_eq!(reward(0, 8_000, 21_000), 0);
        assert_eq!(reward(5_000, 0, 21_000), 0);
        assert_eq!(reward(5_000, 8_000, 0), 0);
    }

    #[test]
    fn test_reward_ratio_one_when_winner_holds_pool() {
        // losing side empty: each winner gets exactly their stake back
        assert_eq!(reward(4_000, 9_000, 9_000), 4_000);
        assert_eq!(reward(5_000, 9_000, 9_000), 5_000);
    }
}
