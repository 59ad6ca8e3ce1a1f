//! The built-in task catalog: short programming tasks in difficulty tiers.
//!
//! Cases are constructed once at startup and shared read-only across all
//! trials. Prompts tell the model exactly what to print so the judges can
//! stay strict.

use crate::judge::Judge;

/// One evaluation case. The name is a unique key; the tier is a 1-based
/// difficulty bucket used for reporting rollups.
#[derive(Debug, Clone)]
pub struct EvalCase {
    pub name: String,
    pub tier: u32,
    pub prompt: String,
    pub judge: Judge,
}

fn case(name: &str, tier: u32, prompt: &str, judge: Judge) -> EvalCase {
    EvalCase {
        name: name.to_string(),
        tier,
        prompt: prompt.to_string(),
        judge,
    }
}

const SUDOKU_GIVENS: [[u8; 9]; 9] = [
    [5, 3, 0, 0, 7, 0, 0, 0, 0],
    [6, 0, 0, 1, 9, 5, 0, 0, 0],
    [0, 9, 8, 0, 0, 0, 0, 6, 0],
    [8, 0, 0, 0, 6, 0, 0, 0, 3],
    [4, 0, 0, 8, 0, 3, 0, 0, 1],
    [7, 0, 0, 0, 2, 0, 0, 0, 6],
    [0, 6, 0, 0, 0, 0, 2, 8, 0],
    [0, 0, 0, 4, 1, 9, 0, 0, 5],
    [0, 0, 0, 0, 8, 0, 0, 7, 9],
];

/// The full built-in case set, in catalog order.
pub fn builtin_cases() -> Vec<EvalCase> {
    vec![
        // Tier 1: basics
        case(
            "print_numbers_1_to_20",
            1,
            "Print the integers 1 to 20, one per line. Each line should contain just the number, nothing else.",
            Judge::exact("1\n2\n3\n4\n5\n6\n7\n8\n9\n10\n11\n12\n13\n14\n15\n16\n17\n18\n19\n20"),
        ),
        case(
            "reverse_string",
            1,
            "Reverse the string \"Hello, World!\" and print the result. Print only the reversed string, nothing else.",
            Judge::exact("!dlroW ,olleH"),
        ),
        case(
            "sin_pi_over_6",
            1,
            "Compute sin(π/6) and print the numeric result. Print only the number, nothing else.",
            Judge::numeric(0.5, 0.001),
        ),
        // Tier 2: simple algorithms
        case(
            "fizzbuzz",
            2,
            "Print FizzBuzz for numbers 1 through 30, one entry per line. For multiples of 3 print \"Fizz\", for multiples of 5 print \"Buzz\", for multiples of both print \"FizzBuzz\", otherwise print the number. Print only the output, nothing else.",
            Judge::exact("1\n2\nFizz\n4\nBuzz\nFizz\n7\n8\nFizz\nBuzz\n11\nFizz\n13\n14\nFizzBuzz\n16\n17\nFizz\n19\nBuzz\nFizz\n22\n23\nFizz\nBuzz\n26\nFizz\n28\n29\nFizzBuzz"),
        ),
        case(
            "is_prime_104729",
            2,
            "Determine whether 104729 is a prime number. Print \"true\" if it is prime, or \"false\" if it is not. Print only that single word, nothing else.",
            Judge::exact("true"),
        ),
        case(
            "gcd_48_18",
            2,
            "Compute the greatest common divisor (GCD) of 48 and 18. Print only the number, nothing else.",
            Judge::exact("6"),
        ),
        case(
            "count_vowels",
            2,
            "Count the number of vowels (a, e, i, o, u, case-insensitive) in the string \"The quick brown fox jumps over the lazy dog\". Print only the count, nothing else.",
            Judge::exact("11"),
        ),
        case(
            "decimal_to_binary",
            2,
            "Convert the decimal number 255 to its binary string representation with no prefix (no \"0b\"). Print only the binary string, nothing else.",
            Judge::exact("11111111"),
        ),
        case(
            "quadratic_roots",
            2,
            "Find the two real roots of x^2 - 5x + 6 = 0. Print both roots as integers on a single line separated by a single space. Print only the two numbers, nothing else.",
            Judge::any_of(["2 3", "3 2"]),
        ),
        case(
            "pascals_triangle",
            2,
            "Print the first 10 rows of Pascal's triangle (rows 0 through 9). Print one row per line, with numbers separated by single spaces. Row 0 is \"1\", row 1 is \"1 1\", etc. Print only the triangle, nothing else.",
            Judge::exact("1\n1 1\n1 2 1\n1 3 3 1\n1 4 6 4 1\n1 5 10 10 5 1\n1 6 15 20 15 6 1\n1 7 21 35 35 21 7 1\n1 8 28 56 70 56 28 8 1\n1 9 36 84 126 126 84 36 9 1"),
        ),
        // Tier 3: intermediate
        case(
            "sieve_of_eratosthenes",
            3,
            "Use the Sieve of Eratosthenes to find all prime numbers below 10000. Print three lines: first line is the count of primes found, second line is the first 10 primes separated by spaces, third line is the last 10 primes separated by spaces. Print only these three lines, nothing else.",
            Judge::exact("1229\n2 3 5 7 11 13 17 19 23 29\n9887 9901 9907 9923 9929 9931 9941 9949 9967 9973"),
        ),
        case(
            "fibonacci_30",
            3,
            "Print the first 30 Fibonacci numbers F(0) through F(29), one per line. F(0)=0, F(1)=1, F(n)=F(n-1)+F(n-2). Print only the numbers, one per line, nothing else.",
            Judge::exact("0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n55\n89\n144\n233\n377\n610\n987\n1597\n2584\n4181\n6765\n10946\n17711\n28657\n46368\n75025\n121393\n196418\n317811\n514229"),
        ),
        case(
            "balanced_parentheses",
            3,
            "Check whether each of the following strings has balanced parentheses. For each string, print \"true\" if balanced or \"false\" if not, one result per line in order. The strings are: \"(()())\", \"(()\", \"()()\", \")(\", \"\", \"((()))\", \"(()))\". Print only \"true\" or \"false\" on each line, nothing else.",
            Judge::exact("true\nfalse\ntrue\nfalse\ntrue\ntrue\nfalse"),
        ),
        case(
            "longest_common_subsequence",
            3,
            "Find the length of the longest common subsequence of \"ABCBDAB\" and \"BDCAB\". Print only the number, nothing else.",
            Judge::exact("4"),
        ),
        case(
            "roman_numerals",
            3,
            "Convert each of the following integers to Roman numerals and print each on its own line: 1, 4, 9, 14, 42, 99, 1994, 3999. Print only the Roman numeral strings, one per line, nothing else.",
            Judge::exact("I\nIV\nIX\nXIV\nXLII\nXCIX\nMCMXCIV\nMMMCMXCIX"),
        ),
        case(
            "run_length_encoding",
            3,
            "Run-length encode the string \"aaabbbccccdddddeee\". Output format: each character followed immediately by its count, concatenated together. For example, \"aabbc\" becomes \"a2b2c1\". Print only the encoded string, nothing else.",
            Judge::exact("a3b3c4d5e3"),
        ),
        // Tier 4: hard
        case(
            "max_subarray_sum",
            4,
            "Find the maximum contiguous subarray sum (Kadane's algorithm) of the array [-2, 1, -3, 4, -1, 2, 1, -5, 4]. Print only the number, nothing else.",
            Judge::exact("6"),
        ),
        case(
            "count_islands",
            4,
            "Count the number of islands in a 2D grid. An island is a group of 1s connected horizontally or vertically. The grid (4 rows, 5 columns) is:\nRow 0: 1 1 0 0 0\nRow 1: 1 1 0 0 0\nRow 2: 0 0 1 0 0\nRow 3: 0 0 0 1 1\nPrint only the count of islands, nothing else.",
            Judge::exact("3"),
        ),
        case(
            "levenshtein_distance",
            4,
            "Compute the Levenshtein (edit) distance between \"kitten\" and \"sitting\". Print only the number, nothing else.",
            Judge::exact("3"),
        ),
        case(
            "minimum_coins",
            4,
            "Find the minimum number of coins from denominations [1, 5, 10, 25] needed to make exactly 63 cents. Print only the number, nothing else.",
            Judge::exact("6"),
        ),
        case(
            "topological_sort",
            4,
            "Perform a topological sort on a directed acyclic graph with these edges: A→B, A→C, B→D, C→D, D→E. Print the vertices in a valid topological order, separated by spaces, on a single line. Print only the vertex names separated by spaces, nothing else.",
            Judge::topological(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D"), ("D", "E")]),
        ),
        case(
            "sudoku_solver",
            4,
            "Solve this Sudoku puzzle. The grid uses 0 for empty cells:\n5 3 0 0 7 0 0 0 0\n6 0 0 1 9 5 0 0 0\n0 9 8 0 0 0 0 6 0\n8 0 0 0 6 0 0 0 3\n4 0 0 8 0 3 0 0 1\n7 0 0 0 2 0 0 0 6\n0 6 0 0 0 0 2 8 0\n0 0 0 4 1 9 0 0 5\n0 0 0 0 8 0 0 7 9\nPrint the completed 9x9 grid with numbers separated by spaces, one row per line. Print only the grid, nothing else.",
            Judge::sudoku(SUDOKU_GIVENS),
        ),
    ]
}
