//! Built-in floor phrase table.
//!
//! Enumeration order is significant: a longer phrase must appear before any
//! shorter phrase it contains (`二十一楼` before `一楼`, `NINETY FIRST` before
//! `FIRST`, `FIRST FLOOR UNDERGROUND` before `FIRST`).  Lookup walks this
//! slice front to back and the first hit wins.

/// `(phrase, floor)` pairs in match-priority order.
pub static BUILTIN_FLOORS: &[(&str, i32)] = &[
    // Basement, 负N
    ("负一", -1), ("负二", -2), ("负三", -3), ("负四", -4), ("负五", -5),
    // Basement, 地下N
    ("地下一", -1), ("地下二", -2), ("地下三", -3), ("地下四", -4), ("地下五", -5),
    // 99..1 with 楼
    ("九十九楼", 99), ("九十八楼", 98), ("九十七楼", 97), ("九十六楼", 96), ("九十五楼", 95),
    ("九十四楼", 94), ("九十三楼", 93), ("九十二楼", 92), ("九十一楼", 91), ("九十楼", 90),
    ("八十九楼", 89), ("八十八楼", 88), ("八十七楼", 87), ("八十六楼", 86), ("八十五楼", 85),
    ("八十四楼", 84), ("八十三楼", 83), ("八十二楼", 82), ("八十一楼", 81), ("八十楼", 80),
    ("七十九楼", 79), ("七十八楼", 78), ("七十七楼", 77), ("七十六楼", 76), ("七十五楼", 75),
    ("七十四楼", 74), ("七十三楼", 73), ("七十二楼", 72), ("七十一楼", 71), ("七十楼", 70),
    ("六十九楼", 69), ("六十八楼", 68), ("六十七楼", 67), ("六十六楼", 66), ("六十五楼", 65),
    ("六十四楼", 64), ("六十三楼", 63), ("六十二楼", 62), ("六十一楼", 61), ("六十楼", 60),
    ("五十九楼", 59), ("五十八楼", 58), ("五十七楼", 57), ("五十六楼", 56), ("五十五楼", 55),
    ("五十四楼", 54), ("五十三楼", 53), ("五十二楼", 52), ("五十一楼", 51), ("五十楼", 50),
    ("四十九楼", 49), ("四十八楼", 48), ("四十七楼", 47), ("四十六楼", 46), ("四十五楼", 45),
    ("四十四楼", 44), ("四十三楼", 43), ("四十二楼", 42), ("四十一楼", 41), ("四十楼", 40),
    ("三十九楼", 39), ("三十八楼", 38), ("三十七楼", 37), ("三十六楼", 36), ("三十五楼", 35),
    ("三十四楼", 34), ("三十三楼", 33), ("三十二楼", 32), ("三十一楼", 31), ("三十楼", 30),
    ("二十九楼", 29), ("二十八楼", 28), ("二十七楼", 27), ("二十六楼", 26), ("二十五楼", 25),
    ("二十四楼", 24), ("二十三楼", 23), ("二十二楼", 22), ("二十一楼", 21), ("二十楼", 20),
    ("十九楼", 19), ("十八楼", 18), ("十七楼", 17), ("十六楼", 16), ("十五楼", 15),
    ("十四楼", 14), ("十三楼", 13), ("十二楼", 12), ("十一楼", 11), ("十楼", 10),
    ("九楼", 9), ("八楼", 8), ("七楼", 7), ("六楼", 6), ("五楼", 5),
    ("四楼", 4), ("三楼", 3), ("二楼", 2), ("两楼", 2), ("一楼", 1),
    // 99..1 with 层
    ("九十九层", 99), ("九十八层", 98), ("九十七层", 97), ("九十六层", 96), ("九十五层", 95),
    ("九十四层", 94), ("九十三层", 93), ("九十二层", 92), ("九十一层", 91), ("九十层", 90),
    ("八十九层", 89), ("八十八层", 88), ("八十七层", 87), ("八十六层", 86), ("八十五层", 85),
    ("八十四层", 84), ("八十三层", 83), ("八十二层", 82), ("八十一层", 81), ("八十层", 80),
    ("七十九层", 79), ("七十八层", 78), ("七十七层", 77), ("七十六层", 76), ("七十五层", 75),
    ("七十四层", 74), ("七十三层", 73), ("七十二层", 72), ("七十一层", 71), ("七十层", 70),
    ("六十九层", 69), ("六十八层", 68), ("六十七层", 67), ("六十六层", 66), ("六十五层", 65),
    ("六十四层", 64), ("六十三层", 63), ("六十二层", 62), ("六十一层", 61), ("六十层", 60),
    ("五十九层", 59), ("五十八层", 58), ("五十七层", 57), ("五十六层", 56), ("五十五层", 55),
    ("五十四层", 54), ("五十三层", 53), ("五十二层", 52), ("五十一层", 51), ("五十层", 50),
    ("四十九层", 49), ("四十八层", 48), ("四十七层", 47), ("四十六层", 46), ("四十五层", 45),
    ("四十四层", 44), ("四十三层", 43), ("四十二层", 42), ("四十一层", 41), ("四十层", 40),
    ("三十九层", 39), ("三十八层", 38), ("三十七层", 37), ("三十六层", 36), ("三十五层", 35),
    ("三十四层", 34), ("三十三层", 33), ("三十二层", 32), ("三十一层", 31), ("三十层", 30),
    ("二十九层", 29), ("二十八层", 28), ("二十七层", 27), ("二十六层", 26), ("二十五层", 25),
    ("二十四层", 24), ("二十三层", 23), ("二十二层", 22), ("二十一层", 21), ("二十层", 20),
    ("十九层", 19), ("十八层", 18), ("十七层", 17), ("十六层", 16), ("十五层", 15),
    ("十四层", 14), ("十三层", 13), ("十二层", 12), ("十一层", 11), ("十层", 10),
    ("九层", 9), ("八层", 8), ("七层", 7), ("六层", 6), ("五层", 5),
    ("四层", 4), ("三层", 3), ("二层", 2), ("两层", 2), ("一层", 1),
    // English basement ordinals
    ("FIFTH FLOOR UNDERGROUND", -5), ("FOURTH FLOOR UNDERGROUND", -4), ("THIRD FLOOR UNDERGROUND", -3), ("SECOND FLOOR UNDERGROUND", -2), ("FIRST FLOOR UNDERGROUND", -1),
    // English ordinals, 99..1
    ("NINETY NINTH", 99), ("NINETY EIGHTH", 98), ("NINETY SEVENTH", 97), ("NINETY SIXTH", 96), ("NINETY FIFTH", 95),
    ("NINETY FOURTH", 94), ("NINETY THIRD", 93), ("NINETY SECOND", 92), ("NINETY FIRST", 91), ("NINETIETH", 90),
    ("EIGHTY NINTH", 89), ("EIGHTY EIGHTH", 88), ("EIGHTY SEVENTH", 87), ("EIGHTY SIXTH", 86), ("EIGHTY FIFTH", 85),
    ("EIGHTY FOURTH", 84), ("EIGHTY THIRD", 83), ("EIGHTY SECOND", 82), ("EIGHTY FIRST", 81), ("EIGHTIETH", 80),
    ("SEVENTY NINTH", 79), ("SEVENTY EIGHTH", 78), ("SEVENTY SEVENTH", 77), ("SEVENTY SIXTH", 76), ("SEVENTY FIFTH", 75),
    ("SEVENTY FOURTH", 74), ("SEVENTY THIRD", 73), ("SEVENTY SECOND", 72), ("SEVENTY FIRST", 71), ("SEVENTIETH", 70),
    ("SIXTY NINTH", 69), ("SIXTY EIGHTH", 68), ("SIXTY SEVENTH", 67), ("SIXTY SIXTH", 66), ("SIXTY FIFTH", 65),
    ("SIXTY FOURTH", 64), ("SIXTY THIRD", 63), ("SIXTY SECOND", 62), ("SIXTY FIRST", 61), ("SIXTIETH", 60),
    ("FIFTY NINTH", 59), ("FIFTY EIGHTH", 58), ("FIFTY SEVENTH", 57), ("FIFTY SIXTH", 56), ("FIFTY FIFTH", 55),
    ("FIFTY FOURTH", 54), ("FIFTY THIRD", 53), ("FIFTY SECOND", 52), ("FIFTY FIRST", 51), ("FIFTIETH", 50),
    ("FORTY NINTH", 49), ("FORTY EIGHTH", 48), ("FORTY SEVENTH", 47), ("FORTY SIXTH", 46), ("FORTY FIFTH", 45),
    ("FORTY FOURTH", 44), ("FORTY THIRD", 43), ("FORTY SECOND", 42), ("FORTY FIRST", 41), ("FORTIETH", 40),
    ("THIRTY NINTH", 39), ("THIRTY EIGHTH", 38), ("THIRTY SEVENTH", 37), ("THIRTY SIXTH", 36), ("THIRTY FIFTH", 35),
    ("THIRTY FOURTH", 34), ("THIRTY THIRD", 33), ("THIRTY SECOND", 32), ("THIRTY FIRST", 31), ("THIRTIETH", 30),
    ("TWENTY NINTH", 29), ("TWENTY EIGHTH", 28), ("TWENTY SEVENTH", 27), ("TWENTY SIXTH", 26), ("TWENTY FIFTH", 25),
    ("TWENTY FOURTH", 24), ("TWENTY THIRD", 23), ("TWENTY SECOND", 22), ("TWENTY FIRST", 21), ("TWENTIETH", 20),
    ("NINETEENTH", 19), ("EIGHTEENTH", 18), ("SEVENTEENTH", 17), ("SIXTEENTH", 16), ("FIFTEENTH", 15),
    ("FOURTEENTH", 14), ("THIRTEENTH", 13), ("TWELFTH", 12), ("ELEVENTH", 11), ("TENTH", 10),
    ("NINTH", 9), ("EIGHTH", 8), ("SEVENTH", 7), ("SIXTH", 6), ("FIFTH", 5),
    ("FOURTH", 4), ("THIRD", 3), ("SECOND", 2), ("FIRST", 1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_locale_form() {
        // 5 + 5 basement, 99 + 1 per Chinese unit word, 5 + 99 English.
        assert_eq!(BUILTIN_FLOORS.len(), 10 + 100 + 100 + 5 + 99);
    }

    #[test]
    fn phrases_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for (phrase, _) in BUILTIN_FLOORS {
            assert!(seen.insert(*phrase), "duplicate phrase {phrase}");
        }
    }

    #[test]
    fn english_phrases_are_upper_case() {
        for (phrase, _) in BUILTIN_FLOORS {
            assert!(!phrase.chars().any(|c| c.is_ascii_lowercase()), "{phrase}");
        }
    }
}
