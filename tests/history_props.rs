use proptest::prelude::*;
use textadv_client::CommandHistory;

#[derive(Debug, Clone)]
enum Op {
    Previous,
    Next,
    Append(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Previous),
        3 => Just(Op::Next),
        1 => "[a-z ]{0,8}".prop_map(Op::Append),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cursor_tracks_appends(commands in prop::collection::vec("[a-z ]{0,12}", 0..20)) {
        let mut history = CommandHistory::new();
        for (i, command) in commands.iter().enumerate() {
            history.append(command);
            prop_assert_eq!(history.cursor(), i + 1);
        }
        prop_assert_eq!(history.cursor(), commands.len());
    }

    #[test]
    fn full_walk_restores_scratch(
        commands in prop::collection::vec("[a-z ]{0,12}", 1..20),
        scratch in "[a-z ]{0,12}",
    ) {
        let mut history = CommandHistory::new();
        for command in &commands {
            history.append(command);
        }
        let n = commands.len();
        let mut input = scratch.clone();

        for i in (0..n).rev() {
            prop_assert!(history.recall_previous(&mut input));
            prop_assert_eq!(&input, &commands[i]);
        }
        prop_assert!(!history.recall_previous(&mut input));
        prop_assert_eq!(&input, &commands[0]);

        for i in 1..=n {
            prop_assert!(history.recall_next(&mut input));
            if i < n {
                prop_assert_eq!(&input, &commands[i]);
            }
        }
        prop_assert_eq!(&input, &scratch);
        prop_assert!(!history.recall_next(&mut input));
        prop_assert_eq!(&input, &scratch);
    }

    #[test]
    fn cursor_stays_in_bounds(ops in prop::collection::vec(op(), 0..60)) {
        let mut history = CommandHistory::new();
        let mut input = String::new();
        for op in ops {
            let before_input = input.clone();
            let before_cursor = history.cursor();
            match op {
                Op::Previous => {
                    let moved = history.recall_previous(&mut input);
                    if before_cursor == 0 {
                        prop_assert!(!moved);
                        prop_assert_eq!(&input, &before_input);
                    }
                }
                Op::Next => {
                    let moved = history.recall_next(&mut input);
                    if before_cursor == history.len() {
                        prop_assert!(!moved);
                        prop_assert_eq!(&input, &before_input);
                    }
                }
                Op::Append(command) => {
                    history.append(&command);
                    input.clear();
                }
            }
            prop_assert!(history.cursor() <= history.len());
            if history.is_recalling() {
                prop_assert_eq!(Some(input.as_str()), history.get(history.cursor()));
            }
        }
    }
}
