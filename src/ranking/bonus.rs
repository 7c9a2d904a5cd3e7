/// Time bonus awarded for a team's finishing rank at a station, in seconds.
///
/// Ranks 1 through 5 earn a bonus, everything else (including the "unranked"
/// rank 0) earns nothing.
pub fn bonus_for_rank(rank: u32) -> i64 {
    match rank {
        1 => 300,
        2 => 240,
        3 => 180,
        4 => 120,
        5 => 60,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bonus_table_matches_fixed_mapping() {
        assert_eq!(bonus_for_rank(1), 300);
        assert_eq!(bonus_for_rank(2), 240);
        assert_eq!(bonus_for_rank(3), 180);
        assert_eq!(bonus_for_rank(4), 120);
        assert_eq!(bonus_for_rank(5), 60);
    }

    #[test]
    fn unranked_and_out_of_table_ranks_get_zero() {
        assert_eq!(bonus_for_rank(0), 0);
        assert_eq!(bonus_for_rank(6), 0);
        assert_eq!(bonus_for_rank(100), 0);
    }

    #[test]
    fn bonus_is_bounded() {
        for rank in 0..=20 {
            let bonus = bonus_for_rank(rank);
            assert!((0..=300).contains(&bonus));
        }
    }
}
