//! Random maths question generator.
//!
//! Produces arithmetic, factorisation, conversion and linear-equation
//! questions with explicit grading rules and categories. Generation is
//! deterministic for a given seed.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::grading::GradingRule;
use crate::model::{CorrectAnswer, Question, QuestionKind, QuestionSet};

pub const CATEGORY_ARITHMETIC: &str = "Arithmetic";
pub const CATEGORY_NUMBER_THEORY: &str = "Number Theory";
pub const CATEGORY_FRACTIONS: &str = "Fractions & %";
pub const CATEGORY_ALGEBRA: &str = "Algebra";

/// Denominators that give short decimal expansions.
const FRIENDLY_DENOMINATORS: [u32; 8] = [2, 4, 5, 8, 10, 20, 25, 50];

/// Seeded generator of maths questions with unique six-digit ids.
pub struct MathGenerator {
    rng: StdRng,
    used_ids: HashSet<u32>,
}

impl MathGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            used_ids: HashSet::new(),
        }
    }

    fn unique_id(&mut self) -> String {
        loop {
            let id = self.rng.random_range(100_000..=999_999);
            if self.used_ids.insert(id) {
                return id.to_string();
            }
        }
    }

    fn question(
        &mut self,
        kind: QuestionKind,
        text: String,
        answer: CorrectAnswer,
        rule: GradingRule,
        category: &str,
    ) -> Question {
        let id = self.unique_id();
        Question::new(id, kind, text, answer)
            .with_rule(rule)
            .with_category(category)
    }

    /// One question per operation: addition, subtraction, multiplication
    /// and division with remainder.
    pub fn arithmetic(&mut self) -> Vec<Question> {
        let mut questions = Vec::with_capacity(4);

        let a = self.rng.random_range(1000..=9999u32);
        let b = self.rng.random_range(1000..=9999u32);
        questions.push(self.question(
            QuestionKind::Single,
            format!("{a} + {b} = ?"),
            CorrectAnswer::scalar(f64::from(a + b)),
            GradingRule::Numeric,
            CATEGORY_ARITHMETIC,
        ));

        let x = self.rng.random_range(1000..=9999u32);
        let y = self.rng.random_range(1000..=9999u32);
        let (a, b) = (x.max(y), x.min(y));
        questions.push(self.question(
            QuestionKind::Single,
            format!("{a} - {b} = ?"),
            CorrectAnswer::scalar(f64::from(a - b)),
            GradingRule::Numeric,
            CATEGORY_ARITHMETIC,
        ));

        // Keep the product at four digits.
        let b = self.rng.random_range(2..=9u32);
        let mut max_a = (9999 / b).min(9999);
        let mut min_a = (1000u32.div_ceil(b)).max(1000);
        if min_a > max_a {
            min_a = 1000;
            max_a = 9999 / b;
        }
        let a = self.rng.random_range(min_a..=max_a);
        questions.push(self.question(
            QuestionKind::Single,
            format!("{a} × {b} = ?"),
            CorrectAnswer::scalar(f64::from(a * b)),
            GradingRule::Numeric,
            CATEGORY_ARITHMETIC,
        ));

        let divisor = self.rng.random_range(2..=99u32);
        let dividend = self.rng.random_range(1000..=9999u32);
        questions.push(self.question(
            QuestionKind::Dual,
            format!("Divide {dividend} by {divisor}. What is the Quotient and Remainder?"),
            CorrectAnswer::pair(
                i64::from(dividend / divisor),
                i64::from(dividend % divisor),
            ),
            GradingRule::PairExact,
            CATEGORY_ARITHMETIC,
        ));

        questions
    }

    /// Prime factorisation of a number in `10..=499`.
    pub fn factorization(&mut self) -> Question {
        let n = self.rng.random_range(10..=499u64);
        let factors = prime_factors(n)
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.question(
            QuestionKind::Text,
            format!("List all prime factors of {n} (comma separated)"),
            CorrectAnswer::scalar(factors),
            GradingRule::UnorderedNumericList,
            CATEGORY_NUMBER_THEORY,
        )
    }

    /// Fraction to decimal, decimal to percentage, or percentage to fraction.
    pub fn conversion(&mut self) -> Question {
        let denom = FRIENDLY_DENOMINATORS[self.rng.random_range(0..FRIENDLY_DENOMINATORS.len())];
        let numer = self.rng.random_range(1..denom);
        let ratio = f64::from(numer) / f64::from(denom);

        match self.rng.random_range(0..3) {
            0 => self.question(
                QuestionKind::Single,
                format!("Convert {numer}/{denom} to decimal."),
                CorrectAnswer::scalar(round_to(ratio, 4)),
                GradingRule::Numeric,
                CATEGORY_FRACTIONS,
            ),
            1 => {
                let dec = round_to(ratio, 4);
                self.question(
                    QuestionKind::Single,
                    format!("Convert {dec} to percentage."),
                    CorrectAnswer::scalar(round_to(dec * 100.0, 2)),
                    GradingRule::Numeric,
                    CATEGORY_FRACTIONS,
                )
            }
            _ => {
                let perc = round_to(ratio * 100.0, 2);
                let g = gcd(numer, denom);
                self.question(
                    QuestionKind::Text,
                    format!("Convert {perc}% to fraction (as a/b, lowest terms)"),
                    CorrectAnswer::scalar(format!("{}/{}", numer / g, denom / g)),
                    GradingRule::NormalizedString,
                    CATEGORY_FRACTIONS,
                )
            }
        }
    }

    /// Solve `ax + b = c` for an integer or one-decimal `x`.
    pub fn equation(&mut self) -> Question {
        let a = self.rng.random_range(2..=12i64);
        // x and c are kept in tenths so one-decimal answers stay exact.
        let x_tenths = if self.rng.random_bool(0.5) {
            self.rng.random_range(-20..=20i64) * 10
        } else {
            self.rng.random_range(-200..=200i64)
        };
        let b = self.rng.random_range(-20..=20i64);
        let c_tenths = a * x_tenths + b * 10;
        let sign = if b >= 0 { '+' } else { '-' };

        self.question(
            QuestionKind::Single,
            format!(
                "Solve for x: {a}x {sign} {} = {}",
                b.abs(),
                format_tenths(c_tenths)
            ),
            CorrectAnswer::scalar(format_tenths(x_tenths)),
            GradingRule::Numeric,
            CATEGORY_ALGEBRA,
        )
    }

    /// One question drawn from the arithmetic, factorisation and conversion
    /// pools.
    pub fn mixed(&mut self) -> Question {
        let mut pool = self.arithmetic();
        pool.push(self.factorization());
        pool.push(self.conversion());
        let pick = self.rng.random_range(0..pool.len());
        pool.swap_remove(pick)
    }

    /// Ten questions: two each of arithmetic, factorisation, conversion,
    /// mixed and equations, shuffled.
    pub fn generate_all(&mut self) -> Vec<Question> {
        let mut questions = self.arithmetic();
        questions.shuffle(&mut self.rng);
        questions.truncate(2);

        for _ in 0..2 {
            let q = self.factorization();
            questions.push(q);
        }
        for _ in 0..2 {
            let q = self.conversion();
            questions.push(q);
        }
        for _ in 0..2 {
            let q = self.mixed();
            questions.push(q);
        }
        for _ in 0..2 {
            let q = self.equation();
            questions.push(q);
        }

        questions.shuffle(&mut self.rng);
        questions
    }

    /// A complete question set from [`MathGenerator::generate_all`].
    pub fn question_set(&mut self, id: &str, name: &str) -> QuestionSet {
        QuestionSet {
            id: id.to_string(),
            name: name.to_string(),
            description: "Generated maths practice".to_string(),
            questions: self.generate_all(),
        }
    }
}

/// Prime factors of `n` in ascending order, with multiplicity.
pub fn prime_factors(mut n: u64) -> Vec<u64> {
    let mut factors = Vec::new();
    let mut i = 2;
    while i * i <= n {
        while n % i == 0 {
            factors.push(i);
            n /= i;
        }
        i += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

fn format_tenths(tenths: i64) -> String {
    if tenths % 10 == 0 {
        return (tenths / 10).to_string();
    }
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.abs();
    format!("{sign}{}.{}", abs / 10, abs % 10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answer::AnswerValue;
    use crate::grading::grade;
    use crate::model::Scalar;

    #[test]
    fn prime_factors_with_multiplicity() {
        assert_eq!(prime_factors(84), vec![2, 2, 3, 7]);
        assert_eq!(prime_factors(97), vec![97]);
        assert_eq!(prime_factors(10), vec![2, 5]);
    }

    #[test]
    fn tenths_formatting() {
        assert_eq!(format_tenths(30), "3");
        assert_eq!(format_tenths(-35), "-3.5");
        assert_eq!(format_tenths(-5), "-0.5");
        assert_eq!(format_tenths(0), "0");
    }

    #[test]
    fn gcd_and_rounding() {
        assert_eq!(gcd(20, 50), 10);
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(37.5, 2), 37.5);
    }

    #[test]
    fn same_seed_same_questions() {
        let a = MathGenerator::new(7).generate_all();
        let b = MathGenerator::new(7).generate_all();
        assert_eq!(a, b);
    }

    #[test]
    fn generate_all_makes_ten_valid_questions() {
        for seed in 0..20 {
            let questions = MathGenerator::new(seed).generate_all();
            assert_eq!(questions.len(), 10);
            let ids: HashSet<_> = questions.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids.len(), 10, "ids must be unique");
            for q in &questions {
                q.check().unwrap();
                assert_eq!(q.id.len(), 6);
                assert!(q.category.is_some());
            }
        }
    }

    #[test]
    fn arithmetic_answers_are_right() {
        let mut generator = MathGenerator::new(42);
        for q in generator.arithmetic() {
            if let CorrectAnswer::Pair {
                quotient,
                remainder,
            } = &q.correct_answer
            {
                let answer = AnswerValue::Pair {
                    quotient: quotient.to_string(),
                    remainder: remainder.to_string(),
                };
                assert!(grade(&q, Some(&answer)));
                assert!(q.question_text.starts_with("Divide"));
            } else {
                assert_eq!(q.kind, QuestionKind::Single);
            }
        }
    }

    #[test]
    fn multiplication_product_has_four_digits() {
        for seed in 0..50 {
            let q = &MathGenerator::new(seed).arithmetic()[2];
            let CorrectAnswer::Scalar(Scalar::Number(product)) = q.correct_answer else {
                panic!("expected numeric product");
            };
            assert!((1000.0..=9999.0).contains(&product), "{product}");
        }
    }

    #[test]
    fn equation_solution_satisfies_equation() {
        let mut generator = MathGenerator::new(3);
        for _ in 0..20 {
            let q = generator.equation();
            let answer = AnswerValue::Scalar(q.correct_answer.to_string());
            assert!(grade(&q, Some(&answer)));
            assert!(q.question_text.starts_with("Solve for x: "));
        }
    }

    #[test]
    fn factorization_accepts_any_order() {
        let mut generator = MathGenerator::new(11);
        let q = generator.factorization();
        let mut tokens: Vec<String> = q
            .correct_answer
            .to_string()
            .split(',')
            .map(String::from)
            .collect();
        tokens.reverse();
        let answer = AnswerValue::Scalar(tokens.join(", "));
        assert!(grade(&q, Some(&answer)));
    }

    #[test]
    fn conversions_grade_their_own_answer() {
        let mut generator = MathGenerator::new(5);
        for _ in 0..30 {
            let q = generator.conversion();
            assert_eq!(q.category.as_deref(), Some(CATEGORY_FRACTIONS));
            let answer = AnswerValue::Scalar(q.correct_answer.to_string());
            assert!(grade(&q, Some(&answer)), "{}", q.question_text);
        }
    }
}
