use crate::matching::{glob_match, levenshtein, strip_affixes};

#[test]
fn levenshtein_fixed_values() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abc", ""), 3);
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("flaw", "lawn"), 2);
    assert_eq!(levenshtein("Hips", "Hips"), 0);
    // Case differences are ordinary substitutions.
    assert_eq!(levenshtein("hips", "Hips"), 1);
    assert_eq!(levenshtein("UpperLeg.L", "UpperLeg.R"), 1);
}

#[test]
fn levenshtein_metric_laws_on_bone_names() {
    let names = ["Hips", "Spine", "Chest", "chest", "Head", ""];
    for a in names {
        for b in names {
            let d = levenshtein(a, b);
            // Identity of indiscernibles and symmetry.
            assert_eq!(d == 0, a == b, "{a:?} vs {b:?}");
            assert_eq!(d, levenshtein(b, a), "{a:?} vs {b:?}");
            for c in names {
                // Triangle inequality.
                assert!(
                    levenshtein(a, c) <= d + levenshtein(b, c),
                    "{a:?} -> {b:?} -> {c:?}"
                );
            }
        }
    }
}

#[test]
fn levenshtein_counts_chars_not_bytes() {
    // Multi-byte names must not be distance-inflated by their encoding.
    assert_eq!(levenshtein("髪", "髪の毛"), 2);
    assert_eq!(levenshtein("胸", "腰"), 1);
}

#[test]
fn glob_matches_literals_case_sensitively() {
    assert!(glob_match("Hips", "Hips"));
    assert!(!glob_match("hips", "Hips"));
    assert!(!glob_match("Hips", "Hips.001"));
}

#[test]
fn glob_question_mark_matches_one_char() {
    assert!(glob_match("Bone?", "Bone1"));
    assert!(glob_match("Bone?", "BoneX"));
    assert!(!glob_match("Bone?", "Bone"));
    assert!(!glob_match("Bone?", "Bone12"));
}

#[test]
fn glob_star_matches_any_run() {
    assert!(glob_match("*", ""));
    assert!(glob_match("*", "anything"));
    assert!(glob_match("Twist*", "Twist_Arm_L"));
    assert!(glob_match("*_end", "Hips_end"));
    assert!(glob_match("*Skirt*", "Front_Skirt_02"));
    assert!(!glob_match("*Skirt*", "Front_Coat_02"));
}

#[test]
fn glob_star_backtracks_to_later_occurrences() {
    // The first `*` expansion that fails must not sink the match.
    assert!(glob_match("*abc", "ababc"));
    assert!(glob_match("a*bc", "abbbc"));
    assert!(glob_match("*a*b", "xaxaxb"));
    assert!(!glob_match("*abc", "abx"));
}

#[test]
fn glob_trailing_stars_match_empty() {
    assert!(glob_match("Hips*", "Hips"));
    assert!(glob_match("Hips**", "Hips"));
    assert!(!glob_match("Hips*x", "Hips"));
}

#[test]
fn strip_affixes_removes_present_affixes_only() {
    assert_eq!(strip_affixes("Outfit_Hips", "Outfit_", ""), "Hips");
    assert_eq!(strip_affixes("Hips.cloth", "", ".cloth"), "Hips");
    assert_eq!(strip_affixes("Outfit_Hips.cloth", "Outfit_", ".cloth"), "Hips");
    // Affixes that do not occur leave the name alone.
    assert_eq!(strip_affixes("Hips", "Outfit_", ".cloth"), "Hips");
    // Empty affixes strip nothing, even from empty names.
    assert_eq!(strip_affixes("Hips", "", ""), "Hips");
    assert_eq!(strip_affixes("", "", ""), "");
}
