use crate::trial::DirectionCode;

/// Sample stimulus shown under an instruction's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exhibit {
    None,
    /// The single demonstration fish (mouth and tail called out).
    SingleFish,
    /// A five-fish row laid out per the given condition code.
    FishRow(DirectionCode),
}

#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub text: &'static str,
    pub exhibit: Exhibit,
}

/// The scripted walk the administrator reads before timed trials. Pure
/// presentation: no timing, no scoring, one designated key per advance.
pub const SCREENS: &[Screen] = &[
    Screen {
        text: "Welcome to the Flanker Task.",
        exhibit: Exhibit::None,
    },
    Screen {
        text: "This is a fish!\n\nA fish has a MOUTH and a TAIL.\n\nThe fish is pointing the same way the MOUTH is pointing.",
        exhibit: Exhibit::SingleFish,
    },
    Screen {
        text: "Here is a MIDDLE fish! Can you point to the MIDDLE fish?",
        exhibit: Exhibit::FishRow(DirectionCode::Code1),
    },
    Screen {
        text: "Where is the MIDDLE fish here?",
        exhibit: Exhibit::FishRow(DirectionCode::Code1),
    },
    Screen {
        text: "Look at all the fish!!!\n\nThe fish in the MIDDLE is hungry.",
        exhibit: Exhibit::FishRow(DirectionCode::Code1),
    },
    Screen {
        text: "To feed the MIDDLE fish,\npress the arrow key that matches the way the MIDDLE fish is pointing.",
        exhibit: Exhibit::FishRow(DirectionCode::Code1),
    },
    Screen {
        text: "If the MIDDLE fish is pointing this way, press the LEFT arrow key.",
        exhibit: Exhibit::FishRow(DirectionCode::Code1),
    },
    Screen {
        text: "Sometimes all the fish will point the same way.\nSometimes the MIDDLE fish will point a different way from his friends, like this.\n\nYou should always press the key that matches the way the MIDDLE fish is pointing.",
        exhibit: Exhibit::FishRow(DirectionCode::Code3),
    },
    Screen {
        text: "Let me show you how to play!",
        exhibit: Exhibit::None,
    },
    Screen {
        text: "Here the MIDDLE fish is pointing this way, so I'll press the RIGHT arrow key.",
        exhibit: Exhibit::FishRow(DirectionCode::Code2),
    },
    Screen {
        text: "Here the MIDDLE fish is pointing this way, so I'll press the RIGHT arrow key.",
        exhibit: Exhibit::FishRow(DirectionCode::Code3),
    },
    Screen {
        text: "Now it's your turn to try!\n\nTry to answer as fast as you can without making mistakes.\nIf you make a mistake, just keep going!",
        exhibit: Exhibit::None,
    },
    Screen {
        text: "GOOD JOB! Now you get to play on your own without my help.\n\nRemember, keep your eyes on the screen\nand try to answer as fast as you can without making mistakes.\nIf you make a mistake, just keep going!",
        exhibit: Exhibit::None,
    },
    Screen {
        text: "Now you will do the same thing, but you will see arrows instead of fish.\n\nRemember, keep your eyes on the screen\nand try to answer as fast as you can without making mistakes.",
        exhibit: Exhibit::None,
    },
];

/// Linear walk through the instruction screens, advanced one per key press.
#[derive(Debug)]
pub struct InstructionDeck {
    screens: &'static [Screen],
    index: usize,
}

impl Default for InstructionDeck {
    fn default() -> Self {
        Self::new()
    }
}

impl InstructionDeck {
    pub fn new() -> Self {
        Self {
            screens: SCREENS,
            index: 0,
        }
    }

    #[cfg(test)]
    fn with_screens(screens: &'static [Screen]) -> Self {
        Self { screens, index: 0 }
    }

    pub fn current(&self) -> Option<&Screen> {
        self.screens.get(self.index)
    }

    /// The designated advance key was pressed. Returns true while screens
    /// remain to show.
    pub fn advance(&mut self) -> bool {
        if self.index < self.screens.len() {
            self.index += 1;
        }
        !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.screens.len()
    }

    /// (1-based current screen, total).
    pub fn progress(&self) -> (usize, usize) {
        ((self.index + 1).min(self.screens.len()), self.screens.len())
    }
}
