//! Static problem catalog and problem-URL parsing.
//!
//! The catalog is deliberately small, in-memory data: enough problems per
//! category for the orchestrator's random pick. Swapping it for a real
//! problem source only touches this module.

use rand::seq::SliceRandom;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

#[derive(Debug, Clone, Serialize)]
pub struct Example {
    pub input: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    pub category: String,
    pub description: String,
    pub examples: Vec<Example>,
    pub constraints: Vec<String>,
}

fn problem(
    id: &str,
    title: &str,
    difficulty: &str,
    category: &str,
    description: &str,
    examples: Vec<Example>,
    constraints: &[&str],
) -> Problem {
    Problem {
        id: id.to_string(),
        title: title.to_string(),
        difficulty: difficulty.to_string(),
        category: category.to_string(),
        description: description.to_string(),
        examples,
        constraints: constraints.iter().map(|c| c.to_string()).collect(),
    }
}

fn example(input: &str, output: &str, explanation: Option<&str>) -> Example {
    Example {
        input: input.to_string(),
        output: output.to_string(),
        explanation: explanation.map(|e| e.to_string()),
    }
}

static PROBLEMS: LazyLock<Vec<Problem>> = LazyLock::new(|| {
    vec![
        problem(
            "two-sum",
            "Two Sum",
            "Easy",
            "array",
            "Given an array of integers nums and an integer target, return indices of the \
             two numbers such that they add up to target.",
            vec![example(
                "nums = [2,7,11,15], target = 9",
                "[0,1]",
                Some("Because nums[0] + nums[1] == 9, we return [0, 1]."),
            )],
            &[
                "2 <= nums.length <= 10^4",
                "-10^9 <= nums[i] <= 10^9",
                "Only one valid answer exists.",
            ],
        ),
        problem(
            "best-time-to-buy-sell-stock",
            "Best Time to Buy and Sell Stock",
            "Easy",
            "array",
            "You are given an array prices where prices[i] is the price of a given stock on \
             the ith day. Maximize your profit by choosing a single day to buy one stock and \
             a different day in the future to sell it.",
            vec![example(
                "prices = [7,1,5,3,6,4]",
                "5",
                Some("Buy on day 2 (price = 1) and sell on day 5 (price = 6), profit = 5."),
            )],
            &["1 <= prices.length <= 10^5", "0 <= prices[i] <= 10^4"],
        ),
        problem(
            "reverse-linked-list",
            "Reverse Linked List",
            "Easy",
            "linked-list",
            "Given the head of a singly linked list, reverse the list, and return the \
             reversed list.",
            vec![example("head = [1,2,3,4,5]", "[5,4,3,2,1]", None)],
            &[
                "The number of nodes in the list is the range [0, 5000].",
                "-5000 <= Node.val <= 5000",
            ],
        ),
        problem(
            "maximum-depth-binary-tree",
            "Maximum Depth of Binary Tree",
            "Easy",
            "tree",
            "Given the root of a binary tree, return its maximum depth.",
            vec![example("root = [3,9,20,null,null,15,7]", "3", None)],
            &[
                "The number of nodes in the tree is in the range [0, 10^4].",
                "-100 <= Node.val <= 100",
            ],
        ),
        problem(
            "climbing-stairs",
            "Climbing Stairs",
            "Easy",
            "dynamic-programming",
            "You are climbing a staircase. It takes n steps to reach the top. Each time you \
             can climb 1 or 2 steps. In how many distinct ways can you climb to the top?",
            vec![example(
                "n = 2",
                "2",
                Some("There are two ways to climb to the top: 1+1 steps, or 2 steps."),
            )],
            &["1 <= n <= 45"],
        ),
        problem(
            "valid-anagram",
            "Valid Anagram",
            "Easy",
            "hash-table",
            "Given two strings s and t, return true if t is an anagram of s, and false \
             otherwise.",
            vec![example("s = \"anagram\", t = \"nagaram\"", "true", None)],
            &[
                "1 <= s.length, t.length <= 5 * 10^4",
                "s and t consist of lowercase English letters.",
            ],
        ),
        problem(
            "valid-parentheses",
            "Valid Parentheses",
            "Easy",
            "stack-queue",
            "Given a string s containing just the characters '(', ')', '{', '}', '[' and \
             ']', determine if the input string is valid.",
            vec![
                example("s = \"()[]{}\"", "true", None),
                example("s = \"(]\"", "false", None),
            ],
            &["1 <= s.length <= 10^4", "s consists of parentheses only '()[]{}'"],
        ),
        problem(
            "valid-palindrome",
            "Valid Palindrome",
            "Easy",
            "two-pointers",
            "A phrase is a palindrome if, after converting all uppercase letters into \
             lowercase letters and removing all non-alphanumeric characters, it reads the \
             same forward and backward.",
            vec![example("s = \"A man, a plan, a canal: Panama\"", "true", None)],
            &[
                "1 <= s.length <= 2 * 10^5",
                "s consists only of printable ASCII characters.",
            ],
        ),
        problem(
            "maximum-subarray",
            "Maximum Subarray",
            "Medium",
            "sliding-window",
            "Given an integer array nums, find the contiguous subarray (containing at least \
             one number) which has the largest sum and return its sum.",
            vec![example(
                "nums = [-2,1,-3,4,-1,2,1,-5,4]",
                "6",
                Some("[4,-1,2,1] has the largest sum = 6"),
            )],
            &["1 <= nums.length <= 10^5", "-10^4 <= nums[i] <= 10^4"],
        ),
    ]
});

/// Uniform random pick from a category, optionally filtered by difficulty.
/// Returns `None` when the filter matches nothing.
pub fn random_problem(category: &str, difficulty: Option<&str>) -> Option<Problem> {
    let candidates: Vec<&Problem> = PROBLEMS
        .iter()
        .filter(|p| p.category == category)
        .filter(|p| difficulty.is_none_or(|d| p.difficulty == d))
        .collect();
    candidates.choose(&mut rand::thread_rng()).map(|p| (*p).clone())
}

static PROBLEM_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"leetcode\.com/problems/([\w-]+)/?").expect("problem URL pattern must compile")
});

/// Extracts the problem slug from a LeetCode-style URL, or `None` when the
/// URL doesn't have that shape.
pub fn parse_problem_url(url: &str) -> Option<String> {
    PROBLEM_URL
        .captures(url)
        .map(|caps| caps[1].to_string())
}

/// Builds a placeholder problem from a URL slug; the candidate is expected to
/// describe the actual requirements themselves.
pub fn placeholder_from_slug(slug: &str) -> Problem {
    let title = slug
        .split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    Problem {
        id: slug.to_string(),
        title,
        difficulty: "Unknown".to_string(),
        category: "custom".to_string(),
        description: "This is a custom problem. Please describe the problem requirements \
                      and I'll help you solve it."
            .to_string(),
        examples: vec![],
        constraints: vec![],
    }
}
