//! Built-in problem bank
//!
//! The table is built once on first access and never mutated.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use rand::seq::IndexedRandom;
use serde::Serialize;

use arena_common::{Language, ProblemId};

use crate::testcase::TestCase;

/// Problem difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Worked example shown with the description
#[derive(Debug, Clone, Serialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    pub explanation: String,
}

/// A coding problem with starter code and hidden test cases
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub id: ProblemId,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub description: String,
    pub examples: Vec<Example>,
    pub constraints: Vec<String>,
    pub hints: Vec<String>,
    pub starter_code: BTreeMap<Language, String>,
    pub test_cases: Vec<TestCase>,
}

/// Listing view of a problem
#[derive(Debug, Clone, Serialize)]
pub struct ProblemSummary {
    pub id: ProblemId,
    pub title: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub total_tests: usize,
}

impl Problem {
    /// Starter source for a language, if the problem ships one
    pub fn starter_code(&self, language: Language) -> Option<&str> {
        self.starter_code.get(&language).map(String::as_str)
    }

    /// The case used by the try-it path
    pub fn first_test_case(&self) -> Option<&TestCase> {
        self.test_cases.first()
    }

    pub fn summary(&self) -> ProblemSummary {
        ProblemSummary {
            id: self.id,
            title: self.title.clone(),
            difficulty: self.difficulty,
            category: self.category.clone(),
            total_tests: self.test_cases.len(),
        }
    }
}

/// Get a problem by id
pub fn get_problem(id: ProblemId) -> Option<&'static Problem> {
    PROBLEMS.iter().find(|p| p.id == id)
}

/// Get all problems, ordered by id
pub fn get_all_problems() -> &'static [Problem] {
    &PROBLEMS
}

/// Get a uniformly random problem
pub fn get_random_problem() -> &'static Problem {
    PROBLEMS
        .choose(&mut rand::rng())
        .unwrap_or(&PROBLEMS[0])
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn example(input: &str, output: &str, explanation: &str) -> Example {
    Example {
        input: input.to_string(),
        output: output.to_string(),
        explanation: explanation.to_string(),
    }
}

fn starters(python: &str, cpp: &str, java: &str) -> BTreeMap<Language, String> {
    BTreeMap::from([
        (Language::Python, python.to_string()),
        (Language::Cpp, cpp.to_string()),
        (Language::Java, java.to_string()),
    ])
}

static PROBLEMS: LazyLock<Vec<Problem>> =
    LazyLock::new(|| vec![two_sum(), reverse_string(), valid_parentheses()]);

fn two_sum() -> Problem {
    Problem {
        id: 1,
        title: "Two Sum".to_string(),
        difficulty: Difficulty::Easy,
        category: "Arrays".to_string(),
        description: "Given an array of integers nums and an integer target, return indices of \
the two numbers such that they add up to target.\n\n\
You may assume that each input would have exactly one solution, and you may not use the same \
element twice.\n\nYou can return the answer in any order."
            .to_string(),
        examples: vec![
            example(
                "nums = [2,7,11,15], target = 9",
                "[0,1]",
                "Because nums[0] + nums[1] == 9, we return [0, 1].",
            ),
            example(
                "nums = [3,2,4], target = 6",
                "[1,2]",
                "Because nums[1] + nums[2] == 6, we return [1, 2].",
            ),
        ],
        constraints: lines(&[
            "2 <= nums.length <= 10^4",
            "-10^9 <= nums[i] <= 10^9",
            "-10^9 <= target <= 10^9",
            "Only one valid answer exists.",
        ]),
        hints: lines(&[
            "Try using a hash map to store numbers you've seen and their indices.",
            "For each number, check if target - number exists in your hash map.",
        ]),
        starter_code: starters(
            r#"def twoSum(nums, target):
    # Write your code here
    pass

if __name__ == "__main__":
    import json
    nums = json.loads(input())
    target = int(input())
    result = twoSum(nums, target)
    print(json.dumps(result))"#,
            r#"#include <iostream>
#include <sstream>
#include <string>
#include <vector>
using namespace std;

vector<int> twoSum(vector<int>& nums, int target) {
    // Write your code here
    return {};
}

int main() {
    string line;
    getline(cin, line);
    for (char& c : line) {
        if (c == '[' || c == ']' || c == ',') c = ' ';
    }
    istringstream in(line);
    vector<int> nums;
    int value;
    while (in >> value) nums.push_back(value);

    int target;
    cin >> target;

    vector<int> result = twoSum(nums, target);
    cout << "[";
    for (size_t i = 0; i < result.size(); i++) {
        cout << result[i];
        if (i + 1 < result.size()) cout << ",";
    }
    cout << "]" << endl;
    return 0;
}"#,
            r#"import java.util.*;

public class Solution {
    public int[] twoSum(int[] nums, int target) {
        // Write your code here
        return new int[]{};
    }

    public static void main(String[] args) {
        Scanner scanner = new Scanner(System.in);
        String line = scanner.nextLine().replace("[", "").replace("]", "").trim();
        String[] parts = line.isEmpty() ? new String[0] : line.split(",");
        int[] nums = new int[parts.length];
        for (int i = 0; i < parts.length; i++) {
            nums[i] = Integer.parseInt(parts[i].trim());
        }
        int target = scanner.nextInt();

        int[] result = new Solution().twoSum(nums, target);
        System.out.println(Arrays.toString(result));
    }
}"#,
        ),
        test_cases: vec![
            TestCase::new(["[2,7,11,15]", "9"], "[0,1]"),
            TestCase::new(["[3,2,4]", "6"], "[1,2]"),
            TestCase::new(["[3,3]", "6"], "[0,1]"),
        ],
    }
}

fn reverse_string() -> Problem {
    Problem {
        id: 2,
        title: "Reverse String".to_string(),
        difficulty: Difficulty::Easy,
        category: "Strings".to_string(),
        description: "Write a function that reverses a string. The input string is given as an \
array of characters s.\n\nYou must do this by modifying the input array in-place with O(1) extra \
memory."
            .to_string(),
        examples: vec![
            example(r#"s = ["h","e","l","l","o"]"#, r#"["o","l","l","e","h"]"#, ""),
            example(
                r#"s = ["H","a","n","n","a","h"]"#,
                r#"["h","a","n","n","a","H"]"#,
                "",
            ),
        ],
        constraints: lines(&[
            "1 <= s.length <= 10^5",
            "s[i] is a printable ascii character.",
        ]),
        hints: lines(&[
            "Use two pointers approach, one from start and one from end.",
            "Swap characters at both pointers and move them towards center.",
        ]),
        starter_code: starters(
            r#"def reverseString(s):
    # Write your code here
    # Modify s in-place
    pass

if __name__ == "__main__":
    import json
    s = json.loads(input())
    reverseString(s)
    print(json.dumps(s))"#,
            r#"#include <iostream>
#include <string>
#include <vector>
using namespace std;

void reverseString(vector<char>& s) {
    // Write your code here
}

int main() {
    string line;
    getline(cin, line);

    vector<char> s;
    for (char c : line) {
        if (c != '[' && c != ']' && c != '"' && c != ',' && c != ' ') {
            s.push_back(c);
        }
    }

    reverseString(s);

    cout << "[";
    for (size_t i = 0; i < s.size(); i++) {
        cout << "\"" << s[i] << "\"";
        if (i + 1 < s.size()) cout << ",";
    }
    cout << "]" << endl;
    return 0;
}"#,
            r#"import java.util.*;

public class Solution {
    public void reverseString(char[] s) {
        // Write your code here
    }

    public static void main(String[] args) {
        Scanner scanner = new Scanner(System.in);
        String[] parts = scanner.nextLine().replace("[", "").replace("]", "")
                                .replace("\"", "").split(",");
        char[] s = new char[parts.length];
        for (int i = 0; i < parts.length; i++) {
            s[i] = parts[i].trim().charAt(0);
        }

        new Solution().reverseString(s);

        StringBuilder out = new StringBuilder("[");
        for (int i = 0; i < s.length; i++) {
            out.append('"').append(s[i]).append('"');
            if (i + 1 < s.length) out.append(',');
        }
        System.out.println(out.append(']'));
    }
}"#,
        ),
        test_cases: vec![
            TestCase::new([r#"["h","e","l","l","o"]"#], r#"["o","l","l","e","h"]"#),
            TestCase::new(
                [r#"["H","a","n","n","a","h"]"#],
                r#"["h","a","n","n","a","H"]"#,
            ),
        ],
    }
}

fn valid_parentheses() -> Problem {
    Problem {
        id: 3,
        title: "Valid Parentheses".to_string(),
        difficulty: Difficulty::Easy,
        category: "Stack".to_string(),
        description: "Given a string s containing just the characters '(', ')', '{', '}', '[' \
and ']', determine if the input string is valid.\n\nAn input string is valid if:\n\
1. Open brackets must be closed by the same type of brackets.\n\
2. Open brackets must be closed in the correct order.\n\
3. Every close bracket has a corresponding open bracket of the same type."
            .to_string(),
        examples: vec![
            example(r#"s = "()""#, "true", ""),
            example(r#"s = "()[]{}""#, "true", ""),
            example(r#"s = "(]""#, "false", ""),
        ],
        constraints: lines(&[
            "1 <= s.length <= 10^4",
            "s consists of parentheses only '()[]{}'.",
        ]),
        hints: lines(&[
            "Use a stack data structure.",
            "Push opening brackets onto the stack.",
            "When you encounter a closing bracket, check if it matches the top of the stack.",
        ]),
        starter_code: starters(
            r#"def isValid(s):
    # Write your code here
    pass

if __name__ == "__main__":
    s = input().strip()
    result = isValid(s)
    print(str(result).lower())"#,
            r#"#include <iostream>
#include <string>
using namespace std;

bool isValid(string s) {
    // Write your code here
    return false;
}

int main() {
    string s;
    cin >> s;
    cout << (isValid(s) ? "true" : "false") << endl;
    return 0;
}"#,
            r#"import java.util.*;

public class Solution {
    public boolean isValid(String s) {
        // Write your code here
        return false;
    }

    public static void main(String[] args) {
        Scanner scanner = new Scanner(System.in);
        String s = scanner.next();
        System.out.println(new Solution().isValid(s));
    }
}"#,
        ),
        test_cases: vec![
            TestCase::new(["()"], "true"),
            TestCase::new(["()[]{}"], "true"),
            TestCase::new(["(]"], "false"),
            TestCase::new(["([)]"], "false"),
            TestCase::new(["{[]}"], "true"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_problem() {
        let problem = get_problem(1).unwrap();
        assert_eq!(problem.title, "Two Sum");
        assert_eq!(problem.difficulty, Difficulty::Easy);
        assert_eq!(problem.test_cases.len(), 3);

        assert!(get_problem(999).is_none());
    }

    #[test]
    fn test_all_problems_are_complete() {
        let problems = get_all_problems();
        assert_eq!(problems.len(), 3);

        for problem in problems {
            assert!(!problem.test_cases.is_empty(), "problem {}", problem.id);
            for language in Language::ALL {
                assert!(
                    problem.starter_code(language).is_some(),
                    "problem {} lacks {} starter",
                    problem.id,
                    language
                );
            }
        }
    }

    #[test]
    fn test_java_starters_declare_public_class() {
        for problem in get_all_problems() {
            let code = problem.starter_code(Language::Java).unwrap();
            assert!(code.contains("public class Solution"));
        }
    }

    #[test]
    fn test_random_problem_comes_from_bank() {
        for _ in 0..10 {
            let problem = get_random_problem();
            assert!(get_problem(problem.id).is_some());
        }
    }

    #[test]
    fn test_summary_and_first_case() {
        let problem = get_problem(3).unwrap();
        let summary = problem.summary();
        assert_eq!(summary.category, "Stack");
        assert_eq!(summary.total_tests, 5);
        assert_eq!(problem.first_test_case().unwrap().stdin(), "()");
    }
}
