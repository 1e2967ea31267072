//! Camera over the dish. Presentation state only; nothing here feeds back
//! into the simulation.

use crate::dish::Dish;
use cell_core::{OrganismId, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    /// Dish position drawn at the top-left screen cell
    pub offset: Position,
    pub height: u16,
    pub width: u16,
    follow: Option<OrganismId>,
}

impl Viewport {
    pub fn new(height: u16, width: u16) -> Self {
        Self {
            offset: Position::default(),
            height,
            width,
            follow: None,
        }
    }

    pub fn following(&self) -> Option<OrganismId> {
        self.follow
    }

    pub fn pan(&mut self, drow: i32, dcol: i32) {
        self.offset = self.offset.offset(drow, dcol);
    }

    pub fn follow(&mut self, id: OrganismId) {
        self.follow = Some(id);
    }

    pub fn unfollow(&mut self) {
        self.follow = None;
    }

    /// Re-centre on the followed organism, dropping the follow if it is gone.
    pub fn sync(&mut self, dish: &Dish) {
        let Some(id) = self.follow else {
            return;
        };
        match dish.organism(id) {
            Some(organism) => {
                self.offset = Position::new(
                    organism.position.row - i32::from(self.height) / 2,
                    organism.position.col - i32::from(self.width) / 2,
                );
            }
            None => self.follow = None,
        }
    }

    /// Screen cell `(row, col)` of a dish position, if it is visible
    pub fn to_screen(&self, position: Position) -> Option<(u16, u16)> {
        let row = u16::try_from(position.row - self.offset.row).ok()?;
        let col = u16::try_from(position.col - self.offset.col).ok()?;
        (row < self.height && col < self.width).then_some((row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::organism::Organism;
    use cell_core::DishConfig;

    #[test]
    fn test_pan_and_project() {
        let mut viewport = Viewport::new(10, 20);
        assert_eq!(viewport.to_screen(Position::new(3, 4)), Some((3, 4)));
        assert_eq!(viewport.to_screen(Position::new(-1, 4)), None);
        assert_eq!(viewport.to_screen(Position::new(10, 4)), None);

        viewport.pan(2, -5);
        assert_eq!(viewport.offset, Position::new(2, -5));
        assert_eq!(viewport.to_screen(Position::new(3, 4)), Some((1, 9)));
    }

    #[test]
    fn test_follow_centres_and_drops_missing() {
        let mut dish = Dish::new(&DishConfig::default()).unwrap();
        let id = dish.add_organism(Organism::new(Position::new(50, 300), (1, 1)));

        let mut viewport = Viewport::new(10, 20);
        viewport.follow(id);
        viewport.sync(&dish);
        assert_eq!(viewport.offset, Position::new(45, 290));
        assert_eq!(viewport.to_screen(Position::new(50, 300)), Some((5, 10)));

        dish.remove_organism(id);
        viewport.sync(&dish);
        assert_eq!(viewport.following(), None);
        assert_eq!(viewport.offset, Position::new(45, 290));
    }
}
